//! Span context for distributed tracing.

use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::trace_context::{IdGenerator, SpanId, TraceFlags, TraceId, TraceState, ids::is_lower_hex};

/// The propagated identity of one unit of work: trace id, span id, flags and
/// tracestate.
///
/// A context is *valid* when its trace id is not the all-zero value; parsing
/// and generation only produce valid contexts.
///
/// Whether a span is exported is a flag consulted by the exporter, not a
/// different span type. Contexts created for inbound requests are marked
/// non-exportable because the request record already carries them.
///
/// ## Example
///
/// ```rust
/// use trace_correlation::SpanContext;
///
/// // Continue an incoming trace
/// let ctx = SpanContext::from_traceparent(
///     "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
/// )?;
/// assert!(ctx.is_sampled());
///
/// // Start a new trace
/// let root = SpanContext::new_root();
/// assert!(root.is_valid());
/// # Ok::<(), trace_correlation::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanContext {
    trace_id: TraceId,
    span_id: SpanId,
    flags: TraceFlags,
    trace_state: TraceState,
    exportable: bool,
}

impl SpanContext {
    /// Creates a context with the given trace and span IDs and default flags.
    pub fn new(trace_id: TraceId, span_id: SpanId) -> Self {
        Self {
            trace_id,
            span_id,
            flags: TraceFlags::NONE,
            trace_state: TraceState::new(),
            exportable: true,
        }
    }

    /// Creates a new root context with random IDs and default flags.
    pub fn new_root() -> Self {
        Self::new(TraceId::random(), SpanId::random())
    }

    /// Creates a new root context using `ids`.
    pub fn new_root_with<G: IdGenerator + ?Sized>(ids: &G) -> Self {
        Self::new(ids.trace_id(), ids.span_id())
    }

    /// Creates a child: same trace id, flags and tracestate, fresh span id.
    ///
    /// An invalid parent yields a new root instead.
    pub fn child<G: IdGenerator + ?Sized>(&self, ids: &G) -> Self {
        if !self.is_valid() {
            return Self::new_root_with(ids);
        }
        Self {
            trace_id: self.trace_id,
            span_id: ids.span_id(),
            flags: self.flags,
            trace_state: self.trace_state.clone(),
            exportable: true,
        }
    }

    /// Parses a W3C `traceparent` header value (`vv-32hex-16hex-2hex`).
    ///
    /// The header must split into exactly four fields. The version must be two
    /// lowercase hex characters other than the reserved `ff`. Parsing follows
    /// W3C Trace Context strictly: version `ff` and an all-zero span id are
    /// rejected along with an all-zero trace id.
    ///
    /// ```rust
    /// use trace_correlation::SpanContext;
    ///
    /// let ctx = SpanContext::from_traceparent(
    ///     "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"
    /// ).unwrap();
    ///
    /// assert_eq!(ctx.trace_id().to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
    /// assert_eq!(ctx.span_id().to_string(), "00f067aa0ba902b7");
    /// ```
    pub fn from_traceparent(traceparent: &str) -> Result<Self> {
        let parts: Vec<&str> = traceparent.split('-').collect();
        if parts.len() != 4 {
            return Err(Error::invalid_format(format!(
                "traceparent must have 4 fields, found {}",
                parts.len()
            )));
        }

        let version = parts[0];
        if !is_lower_hex(version, 2) || version == "ff" {
            return Err(Error::from_kind(ErrorKind::UnsupportedVersion));
        }

        let trace_id = TraceId::from_hex(parts[1])?;
        let span_id = SpanId::from_hex(parts[2])?;
        let flags = TraceFlags::from_hex(parts[3])?;

        Ok(Self::new(trace_id, span_id).with_flags(flags))
    }

    /// Returns the traceparent header value, always version `00`.
    pub fn to_traceparent(&self) -> String {
        format!("00-{}-{}-{}", self.trace_id, self.span_id, self.flags)
    }

    /// Returns the legacy hierarchical id `|trace.span.`.
    pub fn to_legacy_id(&self) -> String {
        crate::codec::format_legacy_id(&self.trace_id, &self.span_id)
    }

    /// Returns the trace ID.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Returns the span ID.
    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }

    /// Returns the trace flags.
    pub fn flags(&self) -> TraceFlags {
        self.flags
    }

    /// Returns `true` if the trace is sampled.
    pub fn is_sampled(&self) -> bool {
        self.flags.is_sampled()
    }

    /// Returns the tracestate.
    pub fn trace_state(&self) -> &TraceState {
        &self.trace_state
    }

    /// Returns `true` if the trace id is not all zeros.
    pub fn is_valid(&self) -> bool {
        self.trace_id.is_valid()
    }

    /// Returns `true` if an exporter should emit this span.
    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    /// Sets the trace flags.
    #[must_use]
    pub fn with_flags(mut self, flags: TraceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the sampled flag.
    #[must_use]
    pub fn with_sampled(mut self, sampled: bool) -> Self {
        self.flags = self.flags.with_sampled(sampled);
        self
    }

    /// Sets the tracestate.
    #[must_use]
    pub fn with_trace_state(mut self, trace_state: TraceState) -> Self {
        self.trace_state = trace_state;
        self
    }

    /// Sets whether an exporter should emit this span.
    #[must_use]
    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }
}

impl fmt::Display for SpanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_traceparent())
    }
}
