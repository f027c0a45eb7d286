//! Thread-scoped ambient store.

use std::cell::RefCell;

use super::{ContextStore, ScopeHandle, Slot};
use crate::error::Result;
use crate::trace_context::SpanContext;

thread_local! {
    static SLOT: RefCell<Slot> = RefCell::new(Slot::default());
}

/// Keeps the current context per OS thread.
///
/// Suits thread-pool hosts where a request runs on one worker thread at a
/// time. Pooled threads are reused, so every scope must be released before
/// the thread returns to the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalStore;

impl ThreadLocalStore {
    /// Returns the number of scopes open on this thread.
    pub fn depth(&self) -> usize {
        with_thread_slot(|slot| slot.depth())
    }
}

impl ContextStore for ThreadLocalStore {
    fn current(&self) -> Option<SpanContext> {
        with_thread_slot(|slot| slot.current())
    }

    fn enter(&self, ctx: SpanContext) -> ScopeHandle {
        with_thread_slot(|slot| slot.enter(ctx))
    }

    fn try_release(&self, handle: ScopeHandle) -> Result<()> {
        with_thread_slot(|slot| slot.release(handle))
    }
}

pub(super) fn with_thread_slot<R>(f: impl FnOnce(&mut Slot) -> R) -> R {
    SLOT.with(|slot| f(&mut slot.borrow_mut()))
}
