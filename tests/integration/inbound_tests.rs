//! Inbound resolution through the public API.

use std::collections::HashMap;

use trace_correlation::{
    CorrelationConfig,
    codec::validate_trace_id,
    inbound::{CorrelationPath, InboundCorrelator, LEGACY_ROOT_ID_PROPERTY},
    propagation::{REQUEST_CONTEXT, REQUEST_ID, TRACEPARENT, TRACESTATE},
    telemetry::RequestTelemetry,
    testing::SequenceIdGenerator,
};

use crate::common::{self, headers};

#[test]
fn test_no_headers() {
    let resolved = common::inbound().correlate(&headers(&[]));

    assert!(validate_trace_id(&resolved.operation_id));
    assert_eq!(resolved.parent_id, None);
    assert!(resolved.self_id.starts_with(&format!("|{}.", resolved.operation_id)));
}

#[test]
fn test_traceparent() {
    let resolved = common::inbound().correlate(&headers(&[(TRACEPARENT, common::TRACEPARENT)]));

    assert_eq!(resolved.operation_id, "0123456789abcdef0123456789abcdef");
    assert_eq!(
        resolved.parent_id.as_deref(),
        Some("|0123456789abcdef0123456789abcdef.0123456789abcdef.")
    );
}

#[test]
fn test_legacy_header_with_non_trace_root() {
    let resolved = common::inbound().correlate(&headers(&[(REQUEST_ID, "|rootId.1.2.3.")]));

    assert_eq!(resolved.parent_id.as_deref(), Some("|rootId.1.2.3."));
    assert_eq!(resolved.properties[LEGACY_ROOT_ID_PROPERTY], "rootId");
}

#[test]
fn test_legacy_header_with_trace_root() {
    let resolved = common::inbound()
        .correlate(&headers(&[(REQUEST_ID, "|abcdef0123456789abcdef0123456789.1.2.3.")]));

    assert_eq!(resolved.operation_id, "abcdef0123456789abcdef0123456789");
    assert!(!resolved.properties.contains_key(LEGACY_ROOT_ID_PROPERTY));
}

#[test]
fn test_both_headers_ignore_legacy() {
    let resolved = common::inbound().correlate(&headers(&[
        (TRACEPARENT, common::TRACEPARENT),
        (REQUEST_ID, "|rootId.1.2.3."),
    ]));

    assert_eq!(resolved.path, CorrelationPath::TraceParent);
    assert!(!resolved.properties.contains_key(LEGACY_ROOT_ID_PROPERTY));
    assert_eq!(
        resolved.parent_id.as_deref(),
        Some("|0123456789abcdef0123456789abcdef.0123456789abcdef.")
    );
}

#[test]
fn test_backcompat_off_ignores_legacy() {
    let correlator = InboundCorrelator::new(CorrelationConfig::w3c_only())
        .with_id_generator(SequenceIdGenerator::new());
    let resolved = correlator.correlate(&headers(&[(REQUEST_ID, "|rootId.1.2.3.")]));

    assert_eq!(resolved.path, CorrelationPath::Fresh);
    assert_eq!(resolved.parent_id, None);
    assert!(resolved.properties.is_empty());
}

#[test]
fn test_header_names_are_case_insensitive() {
    let resolved = common::inbound().correlate(&headers(&[
        ("TraceParent", common::TRACEPARENT),
        ("TRACESTATE", "k=v"),
        ("request-context", "appId=cid-v1:caller"),
    ]));

    assert_eq!(resolved.operation_id, "0123456789abcdef0123456789abcdef");
    assert_eq!(resolved.properties["k"], "v");
    assert_eq!(resolved.source.as_deref(), Some("cid-v1:caller"));
}

#[test]
fn test_malformed_headers_never_fail() {
    for traceparent in [
        "",
        "garbage",
        "00-0123456789ABCDEF0123456789ABCDEF-0123456789abcdef-00",
        "ff-0123456789abcdef0123456789abcdef-0123456789abcdef-00",
        "00-0123456789abcdef0123456789abcdef-0123456789abcdef",
    ] {
        let resolved = common::inbound().correlate(&headers(&[
            (TRACEPARENT, traceparent),
            (TRACESTATE, "=,,="),
            (REQUEST_CONTEXT, "==="),
        ]));
        assert_eq!(resolved.path, CorrelationPath::Fresh, "traceparent {traceparent:?}");
        assert!(validate_trace_id(&resolved.operation_id));
        assert_eq!(resolved.source, None);
    }
}

#[test]
fn test_request_record_is_stamped() {
    let correlator = common::inbound();
    let resolved = correlator.correlate(&headers(&[
        (TRACEPARENT, common::TRACEPARENT),
        (TRACESTATE, "az=1,vendor=x"),
        (REQUEST_CONTEXT, "appId=cid-v1:caller"),
    ]));

    let mut request = RequestTelemetry::new("GET /orders");
    request.properties.insert("vendor".into(), "caller-supplied".into());
    resolved.apply_to(&mut request);

    assert_eq!(request.id, resolved.self_id);
    assert_eq!(request.operation.id.as_deref(), Some("0123456789abcdef0123456789abcdef"));
    assert_eq!(request.source.as_deref(), Some("cid-v1:caller"));
    assert_eq!(request.properties["az"], "1");
    assert_eq!(request.properties["vendor"], "caller-supplied");
}

#[test]
fn test_response_header() {
    let correlator = common::inbound();
    let mut response: HashMap<String, String> = HashMap::new();

    assert!(correlator.inject_response_headers(&mut response));
    assert_eq!(response[REQUEST_CONTEXT], format!("appId={}", common::SELF_APP_ID));
    assert!(!correlator.inject_response_headers(&mut response));
}
