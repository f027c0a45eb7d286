//! Identifier generation.

use std::fmt;

use crate::trace_context::{SpanId, TraceId};

/// Source of fresh trace and span identifiers.
///
/// Correlators take a generator so tests can inject deterministic IDs; see
/// [`SequenceIdGenerator`](crate::testing::SequenceIdGenerator).
///
/// Implementations must never return the all-zero (invalid) value.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Returns a fresh trace id.
    fn trace_id(&self) -> TraceId;

    /// Returns a fresh span id.
    fn span_id(&self) -> SpanId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn trace_id(&self) -> TraceId {
        (**self).trace_id()
    }

    fn span_id(&self) -> SpanId {
        (**self).span_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for std::sync::Arc<G> {
    fn trace_id(&self) -> TraceId {
        (**self).trace_id()
    }

    fn span_id(&self) -> SpanId {
        (**self).span_id()
    }
}

/// Random identifiers from `fastrand`'s per-thread generator.
///
/// Each thread owns its own wyrand state, seeded independently, so generation
/// never contends on a shared lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn trace_id(&self) -> TraceId {
        TraceId::from_bytes(fastrand::u128(1..).to_be_bytes())
    }

    fn span_id(&self) -> SpanId {
        SpanId::from_bytes(fastrand::u64(1..).to_be_bytes())
    }
}
