//! Outbound propagation through the public API.

use std::collections::HashMap;

use trace_correlation::{
    SpanContext, TraceState,
    ambient::{ContextStore, ThreadLocalStore},
    codec,
    propagation::{REQUEST_CONTEXT, REQUEST_ID, TRACEPARENT, TRACESTATE},
};

use crate::common;

#[test]
fn test_orphaned_dependency() {
    let traceparent = common::outbound().build_traceparent();
    let ctx = codec::parse_traceparent(&traceparent).unwrap();

    assert!(ctx.is_valid());
    assert!(traceparent.ends_with("-00"));
}

#[test]
fn test_hops_share_trace_not_span() {
    let ambient = SpanContext::from_traceparent(common::TRACEPARENT).unwrap().with_sampled(true);
    let _scope = ThreadLocalStore.enter_scoped(ambient.clone());
    let correlator = common::outbound();

    let first = codec::parse_traceparent(&correlator.build_traceparent()).unwrap();
    let second = codec::parse_traceparent(&correlator.build_traceparent()).unwrap();

    assert_eq!(first.trace_id(), ambient.trace_id());
    assert_eq!(second.trace_id(), ambient.trace_id());
    assert_ne!(first.span_id(), second.span_id());
    assert_ne!(first.span_id(), ambient.span_id());
    assert!(first.is_sampled());
}

#[test]
fn test_inject() {
    let ambient = SpanContext::from_traceparent(common::TRACEPARENT)
        .unwrap()
        .with_trace_state(TraceState::new().with("k1", "v1").with("k2", "v2"));
    let _scope = ThreadLocalStore.enter_scoped(ambient);

    let mut outgoing: HashMap<String, String> = HashMap::new();
    let dependency = common::outbound().inject(&mut outgoing);

    assert_eq!(outgoing[TRACEPARENT], dependency.traceparent);
    assert_eq!(outgoing[TRACESTATE], "k1=v1,k2=v2");
    assert_eq!(outgoing[REQUEST_ID], dependency.id);
    assert_eq!(outgoing[REQUEST_CONTEXT], format!("appId={}", common::SELF_APP_ID));
    assert_eq!(
        codec::create_child_id_from_traceparent(&dependency.traceparent),
        dependency.id
    );
}

#[test]
fn test_tracestate_as_string() {
    let correlator = common::outbound();
    assert_eq!(correlator.tracestate_as_string(), None);

    let ambient = SpanContext::from_traceparent(common::TRACEPARENT)
        .unwrap()
        .with_trace_state(TraceState::parse("b=2,a=1", 32));
    let handle = ThreadLocalStore.enter(ambient);
    assert_eq!(correlator.tracestate_as_string().as_deref(), Some("b=2,a=1"));
    ThreadLocalStore.release(handle);
}

#[test]
fn test_target_resolution() {
    let correlator = common::outbound();

    assert_eq!(correlator.target_for("appId=cid-v1:xyz"), "cid-v1:xyz");
    assert_eq!(correlator.target_for("appId=cid-v1:defaultId"), "");
    assert_eq!(correlator.target_for(""), "");
    assert_eq!(correlator.target_for("k=v"), "");
    assert_eq!(correlator.target_for("appId=a=b"), "");
}
