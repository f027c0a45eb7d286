//! Common test harness for trace-correlation integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Once};

use trace_correlation::{
    CorrelationConfig,
    inbound::InboundCorrelator,
    outbound::OutboundCorrelator,
    testing::{FixedAppIdResolver, SequenceIdGenerator},
};

/// AppId of the component under test.
pub const SELF_APP_ID: &str = "cid-v1:defaultId";

/// A valid, unsampled traceparent.
pub const TRACEPARENT: &str = "00-0123456789abcdef0123456789abcdef-0123456789abcdef-00";

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds a header map from pairs.
pub fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// A configuration with an instrumentation key set.
pub fn config() -> CorrelationConfig {
    CorrelationConfig::builder().instrumentation_key("test-ikey").build()
}

/// An inbound correlator with deterministic ids and a resolved appId.
pub fn inbound() -> InboundCorrelator<SequenceIdGenerator, Arc<FixedAppIdResolver>> {
    init_tracing();
    InboundCorrelator::new(config())
        .with_id_generator(SequenceIdGenerator::new())
        .with_resolver(Arc::new(FixedAppIdResolver::new(SELF_APP_ID)))
}

/// An outbound correlator with random ids and a resolved appId.
#[allow(dead_code)]
pub fn outbound() -> OutboundCorrelator<
    trace_correlation::ambient::ThreadLocalStore,
    trace_correlation::RandomIdGenerator,
    Arc<FixedAppIdResolver>,
> {
    init_tracing();
    OutboundCorrelator::new(config()).with_resolver(Arc::new(FixedAppIdResolver::new(SELF_APP_ID)))
}
