//! Configuration types for trace correlation.
//!
//! - [`CorrelationConfig`]: legacy protocol toggle, instrumentation key and
//!   tracestate limits

mod correlation;

pub use correlation::{CorrelationConfig, DEFAULT_MAX_TRACESTATE_MEMBERS};
