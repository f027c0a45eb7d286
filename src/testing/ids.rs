//! Counting id generator.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::trace_context::{IdGenerator, SpanId, TraceId};

/// Generates ids 1, 2, 3, ... with separate counters for trace and span ids.
///
/// The first trace id is `000...001` and the first span id is
/// `0000000000000001`. Ids are never zero.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next_trace: AtomicU64,
    next_span: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many span ids have been handed out.
    pub fn span_ids_issued(&self) -> u64 {
        self.next_span.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn trace_id(&self) -> TraceId {
        let n = self.next_trace.fetch_add(1, Ordering::SeqCst) + 1;
        TraceId::from_bytes(u128::from(n).to_be_bytes())
    }

    fn span_id(&self) -> SpanId {
        let n = self.next_span.fetch_add(1, Ordering::SeqCst) + 1;
        SpanId::from_bytes(n.to_be_bytes())
    }
}
