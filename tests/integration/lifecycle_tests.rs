//! Asynchronous lifecycles across threads and tasks.

use std::sync::{Arc, Barrier};
use std::thread;

use trace_correlation::{
    SpanContext,
    ambient::{ContextStore, TaskLocalStore, ThreadLocalStore},
    lifecycle::{AsyncLifecycle, LifecycleState, Outcome},
    propagation::TRACEPARENT,
    telemetry::{ContextInitializer, Telemetry, TraceTelemetry},
    testing::RecordingListener,
};

use crate::common::{self, headers};

#[test]
fn test_nested_scopes() {
    let store = ThreadLocalStore;
    let a = SpanContext::new_root();
    let b = SpanContext::new_root();

    let ha = store.enter(a.clone());
    let hb = store.enter(b);
    store.release(hb);
    assert_eq!(store.current(), Some(a));
    store.release(ha);
    assert_eq!(store.current(), None);
}

#[test]
fn test_suspend_on_one_thread_complete_on_another() {
    let listener = Arc::new(RecordingListener::new());
    let (resolved, lifecycle, scope) = common::inbound().start_async(
        &headers(&[(TRACEPARENT, common::TRACEPARENT)]),
        ThreadLocalStore,
        listener.clone(),
    );
    let ctx = resolved.span_context.clone();

    // Thread 1: the request thread
    assert_eq!(ThreadLocalStore.current(), Some(ctx.clone()));
    drop(scope);
    assert_eq!(lifecycle.state(), LifecycleState::Suspended);
    assert_eq!(ThreadLocalStore.current(), None);

    // Thread 2: the async continuation
    let resumed = lifecycle.clone();
    let expected = ctx.clone();
    let operation_id = thread::spawn(move || {
        let scope = resumed.resume().unwrap();
        assert_eq!(ThreadLocalStore.current(), Some(expected));

        let mut record = TraceTelemetry::new("continuation");
        ContextInitializer::default().initialize(&mut record);

        assert!(scope.complete(200));
        assert_eq!(ThreadLocalStore.current(), None);
        record.operation().id.clone()
    })
    .join()
    .unwrap();

    assert_eq!(operation_id.as_deref(), Some(resolved.operation_id.as_str()));
    assert_eq!(listener.outcomes(), vec![Outcome::Completed { status_code: 200 }]);
    assert_eq!(listener.calls()[0].0, ctx);
    assert!(!lifecycle.time_out());
    assert_eq!(listener.len(), 1);
}

#[test]
fn test_timeout_races_completion() {
    let listener = Arc::new(RecordingListener::new());
    let (lifecycle, scope) =
        AsyncLifecycle::start(SpanContext::new_root(), ThreadLocalStore, listener.clone());
    drop(scope);

    let barrier = Arc::new(Barrier::new(2));
    let timer = {
        let lifecycle = lifecycle.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            lifecycle.time_out()
        })
    };
    let worker = {
        let lifecycle = lifecycle.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            let scope = lifecycle.resume();
            barrier.wait();
            let won = scope.map(|scope| scope.complete(200)).unwrap_or(false);
            let leaked = ThreadLocalStore.current().is_some();
            (won, leaked)
        })
    };

    let timer_won = timer.join().unwrap();
    let (worker_won, leaked) = worker.join().unwrap();

    assert!(timer_won ^ worker_won);
    assert!(!leaked);
    assert_eq!(listener.len(), 1);
    assert_eq!(lifecycle.active_scopes(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_task_local_request() {
    let listener = Arc::new(RecordingListener::new());
    let recorded = listener.clone();

    let operation_id = tokio::spawn(TaskLocalStore::scope(async move {
        let (resolved, _lifecycle, scope) = common::inbound().start_async(
            &headers(&[(TRACEPARENT, common::TRACEPARENT)]),
            TaskLocalStore,
            recorded,
        );

        for _ in 0..8 {
            tokio::task::yield_now().await;
            assert_eq!(TaskLocalStore.current().as_ref(), Some(&resolved.span_context));
        }

        let mut record = TraceTelemetry::new("after await");
        ContextInitializer::new(TaskLocalStore).initialize(&mut record);

        assert!(scope.complete(204));
        assert_eq!(TaskLocalStore.current(), None);
        record.operation().id.clone()
    }))
    .await
    .unwrap();

    assert_eq!(operation_id.as_deref(), Some("0123456789abcdef0123456789abcdef"));
    assert_eq!(listener.outcomes(), vec![Outcome::Completed { status_code: 204 }]);
}
