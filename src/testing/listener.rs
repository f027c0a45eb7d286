//! Recording lifecycle listener.

use parking_lot::Mutex;

use crate::lifecycle::{LifecycleListener, Outcome};
use crate::trace_context::SpanContext;

/// Remembers every terminal event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    calls: Mutex<Vec<(SpanContext, Outcome)>>,
}

impl RecordingListener {
    /// Creates an empty listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded call.
    pub fn calls(&self) -> Vec<(SpanContext, Outcome)> {
        self.calls.lock().clone()
    }

    /// Returns the recorded outcomes.
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.calls.lock().iter().map(|(_, outcome)| outcome.clone()).collect()
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

impl LifecycleListener for RecordingListener {
    fn on_end(&self, ctx: &SpanContext, outcome: &Outcome) {
        self.calls.lock().push((ctx.clone(), outcome.clone()));
    }
}
