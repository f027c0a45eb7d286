//! Task-scoped ambient store.

use std::cell::RefCell;
use std::future::Future;

use super::thread_local::with_thread_slot;
use super::{ContextStore, ScopeHandle, Slot};
use crate::error::Result;
use crate::trace_context::SpanContext;

tokio::task_local! {
    static TASK_SLOT: RefCell<Slot>;
}

/// Keeps the current context per tokio task.
///
/// A task gets its own slot by running inside [`TaskLocalStore::scope`] or
/// [`TaskLocalStore::scope_with`]. The slot travels with the task across
/// worker threads, so enter/release pairs survive `.await` points. Outside
/// any task scope the store falls back to the thread slot.
///
/// Spawned tasks do not inherit the slot. Use [`TaskLocalStore::bind`] to
/// carry the current context into them.
///
/// ## Example
///
/// ```rust
/// use trace_correlation::{SpanContext, ambient::{ContextStore, TaskLocalStore}};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ctx = SpanContext::new_root();
/// let seen = TaskLocalStore::scope_with(ctx.clone(), async {
///     tokio::task::yield_now().await;
///     TaskLocalStore.current()
/// })
/// .await;
/// assert_eq!(seen, Some(ctx));
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalStore;

impl TaskLocalStore {
    /// Runs `fut` with a fresh, empty slot.
    pub async fn scope<F: Future>(fut: F) -> F::Output {
        TASK_SLOT.scope(RefCell::new(Slot::default()), fut).await
    }

    /// Runs `fut` with a slot whose base context is `ctx`.
    pub async fn scope_with<F: Future>(ctx: SpanContext, fut: F) -> F::Output {
        TASK_SLOT.scope(RefCell::new(Slot::with_base(Some(ctx))), fut).await
    }

    /// Wraps `fut` in a slot seeded with the context current right now.
    ///
    /// Call this before handing work to `tokio::spawn`.
    pub fn bind<F: Future>(&self, fut: F) -> impl Future<Output = F::Output> + use<F> {
        TASK_SLOT.scope(RefCell::new(Slot::with_base(self.current())), fut)
    }

    /// Returns `true` when called inside a task scope.
    pub fn in_scope() -> bool {
        TASK_SLOT.try_with(|_| ()).is_ok()
    }
}

impl ContextStore for TaskLocalStore {
    fn current(&self) -> Option<SpanContext> {
        TASK_SLOT
            .try_with(|slot| slot.borrow().current())
            .unwrap_or_else(|_| with_thread_slot(|slot| slot.current()))
    }

    fn enter(&self, ctx: SpanContext) -> ScopeHandle {
        if Self::in_scope() {
            TASK_SLOT.with(|slot| slot.borrow_mut().enter(ctx))
        } else {
            with_thread_slot(|slot| slot.enter(ctx))
        }
    }

    fn try_release(&self, handle: ScopeHandle) -> Result<()> {
        if Self::in_scope() {
            TASK_SLOT.with(|slot| slot.borrow_mut().release(handle))
        } else {
            with_thread_slot(|slot| slot.release(handle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::ThreadLocalStore;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_context_survives_await_across_workers() {
        let ctx = SpanContext::new_root();
        let expected = ctx.clone();

        let seen = tokio::spawn(TaskLocalStore::scope(async move {
            let store = TaskLocalStore;
            let handle = store.enter(ctx);
            let mut seen = Vec::new();
            for _ in 0..16 {
                tokio::task::yield_now().await;
                seen.push(store.current());
            }
            store.release(handle);
            seen.push(store.current());
            seen
        }))
        .await
        .unwrap();

        assert!(seen[..16].iter().all(|c| c.as_ref() == Some(&expected)));
        assert_eq!(seen[16], None);
    }

    #[tokio::test]
    async fn test_tasks_are_isolated() {
        let a = SpanContext::new_root();
        let b = SpanContext::new_root();

        let (seen_a, seen_b) = tokio::join!(
            TaskLocalStore::scope_with(a.clone(), async {
                tokio::task::yield_now().await;
                TaskLocalStore.current()
            }),
            TaskLocalStore::scope_with(b.clone(), async {
                tokio::task::yield_now().await;
                TaskLocalStore.current()
            }),
        );

        assert_eq!(seen_a, Some(a));
        assert_eq!(seen_b, Some(b));
    }

    #[tokio::test]
    async fn test_bind_carries_context_into_spawn() {
        let ctx = SpanContext::new_root();
        let expected = ctx.clone();

        let seen = TaskLocalStore::scope_with(ctx, async {
            let fut = TaskLocalStore.bind(async { TaskLocalStore.current() });
            tokio::spawn(fut).await.unwrap()
        })
        .await;

        assert_eq!(seen, Some(expected));
    }

    #[tokio::test]
    async fn test_nested_scopes_inside_task() {
        let base = SpanContext::new_root();
        let inner = SpanContext::new_root();

        TaskLocalStore::scope_with(base.clone(), async {
            let store = TaskLocalStore;
            let handle = store.enter(inner.clone());
            assert_eq!(store.current(), Some(inner));
            store.release(handle);
            assert_eq!(store.current(), Some(base));
        })
        .await;
    }

    #[test]
    fn test_falls_back_to_thread_slot() {
        assert!(!TaskLocalStore::in_scope());
        let ctx = SpanContext::new_root();
        let handle = TaskLocalStore.enter(ctx.clone());
        assert_eq!(ThreadLocalStore.current(), Some(ctx));
        TaskLocalStore.release(handle);
        assert_eq!(ThreadLocalStore.current(), None);
    }
}
