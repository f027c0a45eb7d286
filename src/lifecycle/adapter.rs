//! Binding a context to asynchronous completion.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{LifecycleListener, LifecycleState, Outcome};
use crate::ambient::{ContextStore, ScopeHandle, ThreadLocalStore};
use crate::error::{Error, ErrorKind, Result};
use crate::trace_context::SpanContext;

/// Tracks one asynchronous unit of work from start to its single terminal
/// event.
///
/// The context is entered on every thread that runs the work, through a
/// [`LifecycleScope`]. Dropping a scope suspends the work and releases the
/// context on that thread. Exactly one of complete, time out or fail wins;
/// the listener sees it once and later terminal events are ignored.
///
/// Handles are cheap to clone and may be sent to timer or callback threads.
///
/// ## Example
///
/// ```rust
/// use std::thread;
/// use trace_correlation::{
///     SpanContext,
///     ambient::{ContextStore, ThreadLocalStore},
///     lifecycle::{AsyncLifecycle, LifecycleState, NoopListener},
/// };
///
/// let ctx = SpanContext::new_root();
/// let (lifecycle, scope) = AsyncLifecycle::start(ctx.clone(), ThreadLocalStore, NoopListener);
/// drop(scope); // suspend: the request thread goes back to the pool
///
/// let resumed = lifecycle.clone();
/// thread::spawn(move || {
///     let scope = resumed.resume().unwrap();
///     assert_eq!(ThreadLocalStore.current(), Some(ctx));
///     scope.complete(200);
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(lifecycle.state(), LifecycleState::Completed);
/// ```
pub struct AsyncLifecycle<S: ContextStore = ThreadLocalStore> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    ctx: SpanContext,
    store: S,
    listener: Box<dyn LifecycleListener>,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    phase: LifecycleState,
    active_scopes: usize,
}

impl<S: ContextStore> AsyncLifecycle<S> {
    /// Starts tracking `ctx` and enters it on the calling thread.
    pub fn start<L>(ctx: SpanContext, store: S, listener: L) -> (Self, LifecycleScope<S>)
    where
        L: LifecycleListener + 'static,
    {
        let lifecycle = Self {
            inner: Arc::new(Inner {
                ctx,
                store,
                listener: Box::new(listener),
                state: Mutex::new(State { phase: LifecycleState::Started, active_scopes: 0 }),
            }),
        };
        let scope = lifecycle.activate();
        tracing::trace!(trace_id = %lifecycle.inner.ctx.trace_id(), "lifecycle started");
        (lifecycle, scope)
    }

    /// Re-enters the context on the calling thread.
    ///
    /// Returns `None` once the work has ended; late callbacks then run
    /// without the context instead of resurrecting it.
    pub fn resume(&self) -> Option<LifecycleScope<S>> {
        {
            let mut state = self.inner.state.lock();
            if state.phase.is_terminal() {
                tracing::debug!(state = %state.phase, "not resuming finished work");
                return None;
            }
            state.phase = LifecycleState::Resumed;
        }
        Some(self.activate())
    }

    /// Records completion with `status_code`. Returns `false` if the work
    /// had already ended.
    pub fn complete(&self, status_code: u16) -> bool {
        self.finish(Outcome::Completed { status_code })
    }

    /// Records a timeout. Returns `false` if the work had already ended.
    pub fn time_out(&self) -> bool {
        self.finish(Outcome::TimedOut)
    }

    /// Records a failure. Returns `false` if the work had already ended.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.finish(Outcome::Errored { message: message.into() })
    }

    /// Applies a terminal outcome, failing with
    /// [`ErrorKind::AlreadyCompleted`] if another one won first.
    pub fn try_finish(&self, outcome: Outcome) -> Result<()> {
        {
            let mut state = self.inner.state.lock();
            if state.phase.is_terminal() {
                return Err(Error::new(
                    ErrorKind::AlreadyCompleted,
                    format!("work already ended as {}", state.phase),
                ));
            }
            state.phase = outcome.state();
        }

        tracing::debug!(
            trace_id = %self.inner.ctx.trace_id(),
            state = %outcome.state(),
            "lifecycle ended"
        );
        self.inner.listener.on_end(&self.inner.ctx, &outcome);
        Ok(())
    }

    /// Returns the current state.
    pub fn state(&self) -> LifecycleState {
        self.inner.state.lock().phase
    }

    /// Returns `true` once a terminal event has been recorded.
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Returns the number of threads currently running the work.
    pub fn active_scopes(&self) -> usize {
        self.inner.state.lock().active_scopes
    }

    /// Returns the tracked context.
    pub fn context(&self) -> &SpanContext {
        &self.inner.ctx
    }

    fn finish(&self, outcome: Outcome) -> bool {
        match self.try_finish(outcome) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(%error, "ignoring second terminal event");
                false
            }
        }
    }

    fn activate(&self) -> LifecycleScope<S> {
        self.inner.state.lock().active_scopes += 1;
        let handle = self.inner.store.enter(self.inner.ctx.clone());
        LifecycleScope { lifecycle: self.clone(), handle: Some(handle) }
    }

    fn deactivate(&self, handle: ScopeHandle) {
        self.inner.store.release(handle);

        let mut state = self.inner.state.lock();
        state.active_scopes = state.active_scopes.saturating_sub(1);
        if !state.phase.is_terminal() && state.active_scopes == 0 {
            state.phase = LifecycleState::Suspended;
        }
    }
}

impl<S: ContextStore> Clone for AsyncLifecycle<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: ContextStore> fmt::Debug for AsyncLifecycle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AsyncLifecycle")
            .field("ctx", &self.inner.ctx)
            .field("state", &state.phase)
            .field("active_scopes", &state.active_scopes)
            .finish()
    }
}

/// The context entered on one thread for one stretch of the work.
///
/// Dropping it releases the context on that thread and, if the work has not
/// ended, suspends it. Must be dropped on the thread that created it.
#[must_use = "dropping the scope immediately suspends the work"]
pub struct LifecycleScope<S: ContextStore = ThreadLocalStore> {
    lifecycle: AsyncLifecycle<S>,
    handle: Option<ScopeHandle>,
}

impl<S: ContextStore> LifecycleScope<S> {
    /// Returns the lifecycle this scope belongs to.
    pub fn lifecycle(&self) -> &AsyncLifecycle<S> {
        &self.lifecycle
    }

    /// Records completion, then releases the context.
    pub fn complete(self, status_code: u16) -> bool {
        self.lifecycle.complete(status_code)
    }

    /// Records a timeout, then releases the context.
    pub fn time_out(self) -> bool {
        self.lifecycle.time_out()
    }

    /// Records a failure, then releases the context.
    pub fn fail(self, message: impl Into<String>) -> bool {
        self.lifecycle.fail(message)
    }
}

impl<S: ContextStore> fmt::Debug for LifecycleScope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleScope").field("handle", &self.handle).finish()
    }
}

impl<S: ContextStore> Drop for LifecycleScope<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.lifecycle.deactivate(handle);
        }
    }
}
