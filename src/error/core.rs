//! Main error type for trace correlation.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The error type for correlation operations.
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: Cow<str>        (human-readable description)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use trace_correlation::{Error, ErrorKind};
///
/// fn describe(err: &Error) -> &'static str {
///     match err.kind() {
///         ErrorKind::AppIdUnresolved => "pending",
///         kind if kind.is_malformed_header() => "malformed",
///         _ => "other",
///     }
/// }
///
/// assert_eq!(describe(&Error::from_kind(ErrorKind::InvalidFlags)), "malformed");
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into(), source: None }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::InvalidFormat => "header has an unexpected structure",
            ErrorKind::UnsupportedVersion => "traceparent version is not supported",
            ErrorKind::InvalidTraceId => "trace id must be 32 lowercase hex characters",
            ErrorKind::InvalidSpanId => "span id must be 16 lowercase hex characters",
            ErrorKind::InvalidFlags => "trace flags must be 2 lowercase hex characters",
            ErrorKind::InvalidTraceState => "tracestate member must be key=value",
            ErrorKind::InvalidRequestContext => "request context must be a single key=value pair",
            ErrorKind::AppIdUnresolved => "appId is not resolved yet",
            ErrorKind::SelfCall => "remote appId equals the current appId",
            ErrorKind::ScopeMismatch => "scope released out of order",
            ErrorKind::AlreadyCompleted => "unit of work already completed",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidFormat, message)
    }

    /// Creates an invalid trace id error.
    pub fn invalid_trace_id(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidTraceId, message)
    }

    /// Creates an invalid span id error.
    pub fn invalid_span_id(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidSpanId, message)
    }

    /// Creates an invalid request context error.
    pub fn invalid_request_context(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidRequestContext, message)
    }

    /// Creates a scope mismatch error.
    pub fn scope_mismatch(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ScopeMismatch, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::invalid_format(format!("invalid hex: {}", err)).with_source(err)
    }
}
