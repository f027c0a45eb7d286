//! Asynchronous request lifecycle.
//!
//! A request may suspend on one thread and resume or finish on another. The
//! [`AsyncLifecycle`] keeps the request's context entered wherever the work
//! runs and guarantees that exactly one terminal event (complete, time out
//! or fail) is reported and that every entered scope is released.

mod adapter;
mod listener;
mod state;

pub use adapter::{AsyncLifecycle, LifecycleScope};
pub use listener::{LifecycleListener, NoopListener};
pub use state::{LifecycleState, Outcome};
