//! Trace identity types.
//!
//! - [`TraceId`], [`SpanId`], [`TraceFlags`]: validated identifiers
//! - [`TraceState`]: ordered vendor key/value entries
//! - [`SpanContext`]: the propagated identity of one unit of work
//! - [`IdGenerator`]: pluggable source of fresh identifiers

mod generator;
mod ids;
mod span_context;
mod tracestate;

pub(crate) use ids::is_lower_hex;

pub use generator::{IdGenerator, RandomIdGenerator};
pub use ids::{SpanId, TraceFlags, TraceId};
pub use span_context::SpanContext;
pub use tracestate::TraceState;
