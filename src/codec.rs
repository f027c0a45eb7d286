//! Validation and formatting of identifiers and wire encodings.
//!
//! These are pure functions. The ones that parse untrusted headers never fail
//! past this boundary: they return `None` or an empty string and log the
//! reason at `debug` level.

use crate::error::{Error, Result};
use crate::trace_context::{
    IdGenerator, RandomIdGenerator, SpanContext, SpanId, TraceId, is_lower_hex,
};

/// Returns `true` iff `s` is 32 characters from `[0-9a-f]`.
///
/// This is a format check only: the all-zero id passes here but never forms a
/// valid [`SpanContext`].
pub fn validate_trace_id(s: &str) -> bool {
    is_lower_hex(s, 32)
}

/// Returns `true` iff `s` is 16 characters from `[0-9a-f]`.
pub fn validate_span_id(s: &str) -> bool {
    is_lower_hex(s, 16)
}

/// Generates a random trace id as 32 lowercase hex characters.
pub fn generate_trace_id() -> String {
    RandomIdGenerator.trace_id().to_hex()
}

/// Generates a random span id as 16 lowercase hex characters.
pub fn generate_span_id() -> String {
    RandomIdGenerator.span_id().to_hex()
}

/// Formats the legacy hierarchical id `|<trace>.<span>.`.
///
/// ```rust
/// use trace_correlation::{SpanId, TraceId, codec};
///
/// let trace = TraceId::from_hex("0123456789abcdef0123456789abcdef").unwrap();
/// let span = SpanId::from_hex("0123456789abcdef").unwrap();
/// assert_eq!(
///     codec::format_legacy_id(&trace, &span),
///     "|0123456789abcdef0123456789abcdef.0123456789abcdef."
/// );
/// ```
pub fn format_legacy_id(trace_id: &TraceId, span_id: &SpanId) -> String {
    format!("|{}.{}.", trace_id, span_id)
}

/// Parses a `traceparent` header, returning `None` on any structural violation.
pub fn parse_traceparent(header: &str) -> Option<SpanContext> {
    match SpanContext::from_traceparent(header) {
        Ok(ctx) => Some(ctx),
        Err(error) => {
            tracing::debug!(header, %error, "ignoring malformed traceparent");
            None
        }
    }
}

/// Converts a `traceparent` header to the legacy `|trace.span.` form.
///
/// Returns an empty string if the header does not parse.
pub fn create_child_id_from_traceparent(header: &str) -> String {
    parse_traceparent(header)
        .map(|ctx| ctx.to_legacy_id())
        .unwrap_or_default()
}

/// A legacy `Request-Id` header split into its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRequestId {
    /// Root operation identifier; ideally, but not necessarily, a trace id.
    pub root: String,
    /// The header exactly as received.
    pub raw: String,
}

impl LegacyRequestId {
    /// Returns the root as a [`TraceId`] if it is one.
    pub fn root_trace_id(&self) -> Result<TraceId> {
        TraceId::from_hex(&self.root)
    }
}

/// Parses a legacy `Request-Id` header of the form `|root.seg.seg...`.
///
/// The root is the text between an optional leading `|` and the first `.`.
/// When no root can be found there, the root is the header verbatim.
///
/// ```rust
/// use trace_correlation::codec;
///
/// let id = codec::parse_legacy_request_id("|rootId.1.2.3.");
/// assert_eq!(id.root, "rootId");
/// assert_eq!(id.raw, "|rootId.1.2.3.");
/// ```
pub fn parse_legacy_request_id(header: &str) -> LegacyRequestId {
    let body = header.strip_prefix('|').unwrap_or(header);
    let root = match body.split_once('.') {
        Some((root, _)) => root,
        None => body,
    };
    let root = if root.is_empty() { header } else { root };

    LegacyRequestId { root: root.to_string(), raw: header.to_string() }
}

/// Joins entries as `key=value` pairs separated by `,`, in the given order.
pub fn format_tracestate<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a single-pair `Request-Context` value and returns the `appId`.
///
/// The value must be exactly one `key=value` pair whose key is `appId` and
/// whose value is non-empty.
pub fn try_parse_request_context_app_id(request_context: &str) -> Result<&str> {
    let fields: Vec<&str> = request_context.split('=').collect();
    if fields.len() != 2 {
        return Err(Error::invalid_request_context(format!(
            "expected a single key=value pair, found {} fields",
            fields.len()
        )));
    }
    if fields[0] != crate::propagation::REQUEST_CONTEXT_APP_ID_KEY {
        return Err(Error::invalid_request_context(format!(
            "unexpected key '{}'",
            fields[0]
        )));
    }
    if fields[1].is_empty() {
        return Err(Error::invalid_request_context("appId is empty"));
    }
    Ok(fields[1])
}
