//! W3C Trace Context propagation.

use crate::error::{Error, Result};
use crate::propagation::{HeaderExtractor, HeaderInjector, TRACEPARENT, TRACESTATE};
use crate::trace_context::{SpanContext, TraceState};

/// A propagator for trace context.
pub trait Propagator {
    /// Extracts a span context from headers.
    fn extract<E: HeaderExtractor + ?Sized>(&self, extractor: &E) -> Result<SpanContext>;

    /// Injects a span context into headers.
    fn inject<I: HeaderInjector + ?Sized>(&self, context: &SpanContext, injector: &mut I);
}

/// W3C Trace Context propagator.
///
/// Implements the [W3C Trace Context](https://www.w3.org/TR/trace-context/) specification.
/// `tracestate` is only honored next to a valid `traceparent`.
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use trace_correlation::{SpanContext, propagation::{Propagator, W3CTraceContext}};
///
/// let propagator = W3CTraceContext::default();
///
/// let ctx = SpanContext::new_root();
/// let mut headers = HashMap::new();
/// propagator.inject(&ctx, &mut headers);
///
/// assert!(headers.contains_key("traceparent"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct W3CTraceContext {
    max_tracestate_members: usize,
}

impl W3CTraceContext {
    /// Creates a propagator keeping at most `max_tracestate_members` entries.
    pub fn new(max_tracestate_members: usize) -> Self {
        Self { max_tracestate_members }
    }
}

impl Default for W3CTraceContext {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TRACESTATE_MEMBERS)
    }
}

impl Propagator for W3CTraceContext {
    fn extract<E: HeaderExtractor + ?Sized>(&self, extractor: &E) -> Result<SpanContext> {
        let traceparent = extractor
            .get_non_empty(TRACEPARENT)
            .ok_or_else(|| Error::invalid_format("traceparent header is absent"))?;

        let mut ctx = SpanContext::from_traceparent(traceparent)?;

        if let Some(tracestate) = extractor.get_non_empty(TRACESTATE) {
            ctx = ctx.with_trace_state(TraceState::parse(tracestate, self.max_tracestate_members));
        }

        Ok(ctx)
    }

    fn inject<I: HeaderInjector + ?Sized>(&self, context: &SpanContext, injector: &mut I) {
        injector.set(TRACEPARENT, context.to_traceparent());

        if !context.trace_state().is_empty() {
            injector.set(TRACESTATE, context.trace_state().to_header());
        }
    }
}
