//! Error kind enumeration for categorizing correlation errors.

/// Categorization of correlation errors.
///
/// ## Recoverable vs Programming Errors
///
/// | ErrorKind               | Recoverable | Boundary behavior              |
/// |-------------------------|-------------|--------------------------------|
/// | `InvalidFormat`         | Yes         | Fall through to next path      |
/// | `UnsupportedVersion`    | Yes         | Fall through to next path      |
/// | `InvalidTraceId`        | Yes         | Fall through to next path      |
/// | `InvalidSpanId`         | Yes         | Fall through to next path      |
/// | `InvalidFlags`          | Yes         | Fall through to next path      |
/// | `InvalidTraceState`     | Yes         | Member skipped                 |
/// | `InvalidRequestContext` | Yes         | Empty target                   |
/// | `AppIdUnresolved`       | Yes         | Empty target / header omitted  |
/// | `SelfCall`              | Yes         | Empty target                   |
/// | `ScopeMismatch`         | No          | Debug assertion                |
/// | `AlreadyCompleted`      | No          | Second terminal event ignored  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Header does not have the expected structure (e.g. wrong field count).
    #[error("invalid format")]
    InvalidFormat,

    /// Traceparent version field is not two hex characters or is the reserved `ff`.
    #[error("unsupported version")]
    UnsupportedVersion,

    /// Trace ID is not 32 lowercase hex characters, or is all zeros.
    #[error("invalid trace id")]
    InvalidTraceId,

    /// Span ID is not 16 lowercase hex characters.
    #[error("invalid span id")]
    InvalidSpanId,

    /// Trace flags are not 2 lowercase hex characters.
    #[error("invalid trace flags")]
    InvalidFlags,

    /// A tracestate member is not a `key=value` pair.
    #[error("invalid tracestate")]
    InvalidTraceState,

    /// A `Request-Context` value is not a single `appId=<value>` pair.
    #[error("invalid request context")]
    InvalidRequestContext,

    /// The appId of this component has not been resolved yet.
    ///
    /// Resolution happens asynchronously outside this crate; the next request
    /// will usually see it.
    #[error("appId unresolved")]
    AppIdUnresolved,

    /// The remote appId equals our own; no target is emitted.
    #[error("self call")]
    SelfCall,

    /// An ambient scope was released out of LIFO order, or on a unit of
    /// execution that never entered it.
    #[error("scope mismatch")]
    ScopeMismatch,

    /// A terminal lifecycle event arrived after the unit already ended.
    #[error("already completed")]
    AlreadyCompleted,
}

impl ErrorKind {
    /// Returns `true` if the error is expected at runtime and handled by
    /// falling back, rather than signalling a bug in the caller.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trace_correlation::ErrorKind;
    ///
    /// assert!(ErrorKind::InvalidTraceId.is_recoverable());
    /// assert!(!ErrorKind::ScopeMismatch.is_recoverable());
    /// ```
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !self.is_programming_error()
    }

    /// Returns `true` for misuse of the scope or lifecycle protocol.
    #[inline]
    pub fn is_programming_error(&self) -> bool {
        matches!(self, ErrorKind::ScopeMismatch | ErrorKind::AlreadyCompleted)
    }

    /// Returns `true` if the error came from validating an inbound header.
    #[inline]
    pub fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidFormat
                | ErrorKind::UnsupportedVersion
                | ErrorKind::InvalidTraceId
                | ErrorKind::InvalidSpanId
                | ErrorKind::InvalidFlags
                | ErrorKind::InvalidTraceState
                | ErrorKind::InvalidRequestContext
        )
    }
}
