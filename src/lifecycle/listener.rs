//! Terminal-event callbacks.

use std::sync::Arc;

use super::Outcome;
use crate::trace_context::SpanContext;

/// Records the end of a unit of work.
///
/// Called exactly once per lifecycle, on whichever thread observes the
/// terminal event, before the context is released there.
pub trait LifecycleListener: Send + Sync {
    /// Handles the terminal outcome for `ctx`.
    fn on_end(&self, ctx: &SpanContext, outcome: &Outcome);
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Arc<L> {
    fn on_end(&self, ctx: &SpanContext, outcome: &Outcome) {
        (**self).on_end(ctx, outcome)
    }
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Box<L> {
    fn on_end(&self, ctx: &SpanContext, outcome: &Outcome) {
        (**self).on_end(ctx, outcome)
    }
}

/// A listener that ignores every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl LifecycleListener for NoopListener {
    fn on_end(&self, _ctx: &SpanContext, _outcome: &Outcome) {}
}
