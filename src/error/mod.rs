//! Error types for trace correlation.
//!
//! Errors fall into three groups:
//! - **Malformed input**: a header is present but fails structural validation.
//!   Correlation degrades to the next fallback path.
//! - **Missing collaborator**: the appId resolver has no answer yet.
//!   Target and appId computations yield an empty string.
//! - **Programming error**: ambient scopes released out of order. Fails loudly
//!   in debug builds, tolerated (and logged) in release builds.
//!
//! ## Key Invariant
//!
//! No error produced here aborts request processing. Operations at the public
//! boundary (`parse_traceparent`, `resolve_target`, `InboundCorrelator::correlate`)
//! collapse errors to `None` or `""`; the `try_*` variants expose the [`Error`].
//!
//! ```rust
//! use trace_correlation::SpanContext;
//!
//! let err = SpanContext::from_traceparent("00-abc-def-01").unwrap_err();
//! assert!(err.kind().is_recoverable());
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use self::kind::ErrorKind;

/// A specialized `Result` type for correlation operations.
pub type Result<T> = std::result::Result<T, Error>;
