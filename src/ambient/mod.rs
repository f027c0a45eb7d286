//! Ambient context: the [`SpanContext`] of the code currently executing.
//!
//! Each logical unit of execution owns a private slot holding its current
//! context. Nothing is shared between units, so the common path takes no
//! locks. Two stores are provided:
//!
//! | Store | Unit | Use for |
//! |-------|------|---------|
//! | [`ThreadLocalStore`] | OS thread | thread-pool hosts |
//! | [`TaskLocalStore`] | tokio task | cooperative async hosts |
//!
//! Contexts are installed with [`ContextStore::enter`], which returns a
//! [`ScopeHandle`]. Releasing the handle restores whatever was current
//! before. Scopes nest and must be released in LIFO order, exactly once, on
//! the unit that entered them.
//!
//! Work that resumes on another thread re-enters the captured context there
//! and releases it when the resumption ends.
//!
//! ## Example
//!
//! ```rust
//! use trace_correlation::{SpanContext, ambient::{ContextStore, ThreadLocalStore}};
//!
//! let store = ThreadLocalStore;
//! let ctx = SpanContext::new_root();
//!
//! let handle = store.enter(ctx.clone());
//! assert_eq!(store.current(), Some(ctx));
//! store.release(handle);
//! assert_eq!(store.current(), None);
//! ```

mod slot;
mod task_local;
mod thread_local;

use std::fmt;

pub use slot::ScopeHandle;
pub(crate) use slot::Slot;
pub use task_local::TaskLocalStore;
pub use thread_local::ThreadLocalStore;

use crate::error::Result;
use crate::trace_context::SpanContext;

/// Scoped storage of the current [`SpanContext`] per unit of execution.
pub trait ContextStore: Send + Sync + fmt::Debug {
    /// Returns the context current on this unit, if any.
    fn current(&self) -> Option<SpanContext>;

    /// Installs `ctx` as current on this unit.
    fn enter(&self, ctx: SpanContext) -> ScopeHandle;

    /// Restores the context `handle` replaced, reporting protocol violations.
    ///
    /// An out-of-order release leaves the newest scope current and hands its
    /// restore value to the next newer scope. A handle not open on this unit
    /// changes nothing.
    fn try_release(&self, handle: ScopeHandle) -> Result<()>;

    /// Restores the context `handle` replaced.
    ///
    /// # Panics
    ///
    /// With debug assertions enabled, panics on a release that is out of
    /// LIFO order or does not belong to this unit. Release builds log the
    /// violation at `warn` and carry on.
    fn release(&self, handle: ScopeHandle) {
        let outcome = self.try_release(handle);
        if let Err(ref error) = outcome {
            tracing::warn!(%error, "ambient scope protocol violated");
        }
        debug_assert!(outcome.is_ok(), "ambient scope protocol violated: {:?}", outcome);
    }

    /// Installs `ctx` and returns a guard releasing it on drop.
    fn enter_scoped(&self, ctx: SpanContext) -> ScopeGuard<'_, Self>
    where
        Self: Sized,
    {
        ScopeGuard { store: self, handle: Some(self.enter(ctx)) }
    }
}

impl<S: ContextStore + ?Sized> ContextStore for &S {
    fn current(&self) -> Option<SpanContext> {
        (**self).current()
    }

    fn enter(&self, ctx: SpanContext) -> ScopeHandle {
        (**self).enter(ctx)
    }

    fn try_release(&self, handle: ScopeHandle) -> Result<()> {
        (**self).try_release(handle)
    }
}

impl<S: ContextStore + ?Sized> ContextStore for std::sync::Arc<S> {
    fn current(&self) -> Option<SpanContext> {
        (**self).current()
    }

    fn enter(&self, ctx: SpanContext) -> ScopeHandle {
        (**self).enter(ctx)
    }

    fn try_release(&self, handle: ScopeHandle) -> Result<()> {
        (**self).try_release(handle)
    }
}

/// Releases its scope when dropped.
///
/// Drop it on the unit that created it.
#[must_use = "dropping the guard immediately releases the scope"]
pub struct ScopeGuard<'s, S: ContextStore> {
    store: &'s S,
    handle: Option<ScopeHandle>,
}

impl<S: ContextStore> ScopeGuard<'_, S> {
    /// Returns the context that was current before this scope.
    pub fn previous(&self) -> Option<&SpanContext> {
        self.handle.as_ref().and_then(ScopeHandle::previous)
    }
}

impl<S: ContextStore> fmt::Debug for ScopeGuard<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").field("handle", &self.handle).finish()
    }
}

impl<S: ContextStore> Drop for ScopeGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.store.release(handle);
        }
    }
}
