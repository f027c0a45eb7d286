//! Per-unit storage of the current context.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::trace_context::SpanContext;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Proof that a context was entered, holding the value it replaced.
///
/// Hand it back to the store it came from, on the same unit of execution,
/// exactly once and in LIFO order.
#[derive(Debug)]
#[must_use = "a scope handle must be released, or the context leaks into later work"]
pub struct ScopeHandle {
    id: u64,
    previous: Option<SpanContext>,
}

impl ScopeHandle {
    /// Returns the context that was current before this scope was entered.
    pub fn previous(&self) -> Option<&SpanContext> {
        self.previous.as_ref()
    }
}

/// A scope still open on a slot, with the value its release restores.
#[derive(Debug)]
struct OpenScope {
    id: u64,
    restore: Option<SpanContext>,
}

/// The current-value slot owned by one thread or task.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    current: Option<SpanContext>,
    open: Vec<OpenScope>,
}

impl Slot {
    /// Creates a slot whose base value is `ctx`.
    pub(crate) fn with_base(ctx: Option<SpanContext>) -> Self {
        Self { current: ctx, open: Vec::new() }
    }

    pub(crate) fn current(&self) -> Option<SpanContext> {
        self.current.clone()
    }

    pub(crate) fn depth(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn enter(&mut self, ctx: SpanContext) -> ScopeHandle {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        let previous = self.current.replace(ctx);
        self.open.push(OpenScope { id, restore: previous.clone() });
        ScopeHandle { id, previous }
    }

    /// Restores the value the handle replaced.
    ///
    /// An out-of-order release reports the violation and leaves the newest
    /// scope current. The next newer scope inherits the released scope's
    /// restore value, so closing every scope always returns the slot to its
    /// base value. A handle this slot never issued changes nothing.
    pub(crate) fn release(&mut self, handle: ScopeHandle) -> Result<()> {
        let Some(position) = self.open.iter().rposition(|scope| scope.id == handle.id) else {
            return Err(Error::scope_mismatch(
                "scope was not entered on this unit of execution or was already released",
            ));
        };

        let released = self.open.remove(position);
        match self.open.get_mut(position) {
            None => {
                self.current = released.restore;
                Ok(())
            }
            Some(newer) => {
                newer.restore = released.restore;
                Err(Error::scope_mismatch(format!(
                    "scope released out of LIFO order with {} newer scope(s) still open",
                    self.open.len() - position
                )))
            }
        }
    }
}
