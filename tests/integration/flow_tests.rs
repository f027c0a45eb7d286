//! End-to-end correlation between two components.

use std::collections::HashMap;
use std::sync::Arc;

use trace_correlation::{
    CorrelationConfig, RandomIdGenerator,
    ambient::{ContextStore, ThreadLocalStore},
    inbound::{CorrelationPath, InboundCorrelator},
    outbound::OutboundCorrelator,
    propagation::{REQUEST_CONTEXT, REQUEST_ID, TRACEPARENT},
    telemetry::{ContextInitializer, DependencyTelemetry, RequestTelemetry, TelemetryRecord},
    testing::FixedAppIdResolver,
};

use crate::common::{self, headers};

type Inbound = InboundCorrelator<RandomIdGenerator, Arc<FixedAppIdResolver>>;
type Outbound = OutboundCorrelator<ThreadLocalStore, RandomIdGenerator, Arc<FixedAppIdResolver>>;

fn component(app_id: &str) -> (Inbound, Outbound) {
    common::init_tracing();
    let resolver = Arc::new(FixedAppIdResolver::new(app_id));
    let config = CorrelationConfig::builder().instrumentation_key(app_id).build();
    (
        InboundCorrelator::new(config.clone()).with_resolver(resolver.clone()),
        OutboundCorrelator::new(config).with_resolver(resolver),
    )
}

#[test]
fn test_two_hop_trace() {
    let (front_in, front_out) = component("cid-v1:front");
    let (back_in, _) = component("cid-v1:back");
    let store = ThreadLocalStore;

    // Front end receives an uncorrelated request
    let (front, front_handle) = front_in.start_request_scope(&headers(&[]), &store);
    let mut front_request = RequestTelemetry::new("GET /checkout");
    front.apply_to(&mut front_request);
    ContextInitializer::default().initialize(&mut front_request);
    assert_eq!(front_request.operation.parent_id, None);

    // and calls the back end
    let mut call: HashMap<String, String> = HashMap::new();
    let dependency = front_out.inject(&mut call);
    let mut dependency_record = DependencyTelemetry::new("POST /payments");
    dependency.apply_to(&mut dependency_record);
    ContextInitializer::default().initialize(&mut dependency_record);
    store.release(front_handle);

    // Back end, possibly on another machine
    let back = back_in.correlate(&call);
    let mut response: HashMap<String, String> = HashMap::new();
    back_in.inject_response_headers(&mut response);

    assert_eq!(back.path, CorrelationPath::TraceParent);
    assert_eq!(back.operation_id, front.operation_id);
    assert_eq!(back.parent_id.as_deref(), Some(dependency.id.as_str()));
    assert_eq!(back.source.as_deref(), Some("cid-v1:front"));

    assert_eq!(dependency_record.operation.parent_id.as_deref(), Some(front.self_id.as_str()));
    assert_eq!(dependency_record.id, dependency.id);

    // Front end labels the dependency with the callee's appId
    dependency_record.target = Some(front_out.target_for(&response[REQUEST_CONTEXT]));
    assert_eq!(dependency_record.target.as_deref(), Some("cid-v1:back"));

    let exported = serde_json::to_value(TelemetryRecord::from(dependency_record)).unwrap();
    assert_eq!(exported["type"], "dependency");
    assert_eq!(exported["operation"]["id"], front.operation_id.as_str());
}

#[test]
fn test_legacy_caller_to_w3c_callee() {
    let (legacy_in, legacy_out) = component("cid-v1:legacy");
    let store = ThreadLocalStore;

    let (resolved, handle) =
        legacy_in.start_request_scope(&headers(&[(REQUEST_ID, "|legacyRoot.3.")]), &store);
    assert_eq!(resolved.path, CorrelationPath::Legacy);
    assert_eq!(resolved.legacy_root_id(), Some("legacyRoot"));

    let mut call: HashMap<String, String> = HashMap::new();
    let dependency = legacy_out.inject(&mut call);
    store.release(handle);

    assert!(call[TRACEPARENT].contains(&resolved.operation_id));
    assert_eq!(call[REQUEST_ID], dependency.id);
    assert!(dependency.id.starts_with(&format!("|{}.", resolved.operation_id)));
}

#[test]
fn test_self_call_has_no_source() {
    let (service_in, service_out) = component("cid-v1:same");
    let store = ThreadLocalStore;

    let (_, handle) = service_in.start_request_scope(&headers(&[]), &store);
    let mut call: HashMap<String, String> = HashMap::new();
    service_out.inject(&mut call);
    store.release(handle);

    let inner = service_in.correlate(&call);
    assert_eq!(inner.source, None);
    assert_eq!(store.current(), None);
}
