//! Inbound request correlation.

use std::collections::BTreeMap;

use super::{CorrelationPath, LEGACY_ROOT_ID_PROPERTY, ResolvedCorrelation};
use crate::ambient::{ContextStore, ScopeHandle};
use crate::codec;
use crate::config::CorrelationConfig;
use crate::lifecycle::{AsyncLifecycle, LifecycleListener, LifecycleScope};
use crate::propagation::{
    AppIdResolver, HeaderExtractor, HeaderInjector, NoAppIdResolver, Propagator, REQUEST_CONTEXT,
    REQUEST_ID, TRACEPARENT, W3CTraceContext, build_request_context_header, try_resolve_target,
};
use crate::trace_context::{IdGenerator, RandomIdGenerator, SpanContext};

/// Resolves the trace identity of inbound requests.
///
/// Headers are tried in order:
///
/// 1. a valid `traceparent` continues the caller's trace;
/// 2. otherwise, with legacy compatibility on, `Request-Id` continues the
///    caller's legacy operation;
/// 3. otherwise a new trace starts.
///
/// Malformed or empty headers fall through to the next step and never fail
/// the request. Every request gets its own fresh span id.
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use trace_correlation::{CorrelationConfig, inbound::InboundCorrelator};
///
/// let correlator = InboundCorrelator::new(CorrelationConfig::default());
///
/// let mut headers = HashMap::new();
/// headers.insert(
///     "traceparent".to_string(),
///     "00-0123456789abcdef0123456789abcdef-0123456789abcdef-00".to_string(),
/// );
///
/// let resolved = correlator.correlate(&headers);
/// assert_eq!(resolved.operation_id, "0123456789abcdef0123456789abcdef");
/// assert_eq!(
///     resolved.parent_id.as_deref(),
///     Some("|0123456789abcdef0123456789abcdef.0123456789abcdef.")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct InboundCorrelator<G = RandomIdGenerator, R = NoAppIdResolver> {
    config: CorrelationConfig,
    ids: G,
    resolver: R,
}

impl InboundCorrelator {
    /// Creates a correlator with random ids and no appId resolver.
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config, ids: RandomIdGenerator, resolver: NoAppIdResolver }
    }
}

impl<G: IdGenerator, R: AppIdResolver> InboundCorrelator<G, R> {
    /// Replaces the id generator.
    pub fn with_id_generator<G2: IdGenerator>(self, ids: G2) -> InboundCorrelator<G2, R> {
        InboundCorrelator { config: self.config, ids, resolver: self.resolver }
    }

    /// Replaces the appId resolver.
    pub fn with_resolver<R2: AppIdResolver>(self, resolver: R2) -> InboundCorrelator<G, R2> {
        InboundCorrelator { config: self.config, ids: self.ids, resolver }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Resolves the request's identity from its headers.
    pub fn correlate<E: HeaderExtractor + ?Sized>(&self, headers: &E) -> ResolvedCorrelation {
        let mut properties = BTreeMap::new();

        let (path, span_context, parent_id) = if let Some(parent) = self.extract_traceparent(headers)
        {
            let parent_id = parent.to_legacy_id();
            for (key, value) in parent.trace_state().to_properties() {
                properties.entry(key).or_insert(value);
            }
            (CorrelationPath::TraceParent, parent.child(&self.ids), Some(parent_id))
        } else if let Some((ctx, raw)) = self.extract_legacy(headers, &mut properties) {
            (CorrelationPath::Legacy, ctx, Some(raw))
        } else {
            (CorrelationPath::Fresh, SpanContext::new_root_with(&self.ids), None)
        };

        let span_context = span_context.with_exportable(false);
        let operation_id = span_context.trace_id().to_hex();
        let self_id = span_context.to_legacy_id();
        let source = self.resolve_source(headers);

        tracing::debug!(
            %path,
            operation_id = %operation_id,
            parent_id = parent_id.as_deref().unwrap_or(""),
            "correlated inbound request"
        );

        ResolvedCorrelation {
            operation_id,
            parent_id,
            self_id,
            properties,
            source,
            path,
            span_context,
        }
    }

    /// Correlates the request and enters its context into `store`.
    ///
    /// The caller releases the returned handle when request processing ends.
    pub fn start_request_scope<E, S>(
        &self,
        headers: &E,
        store: &S,
    ) -> (ResolvedCorrelation, ScopeHandle)
    where
        E: HeaderExtractor + ?Sized,
        S: ContextStore + ?Sized,
    {
        let resolved = self.correlate(headers);
        let handle = store.enter(resolved.span_context.clone());
        (resolved, handle)
    }

    /// Correlates the request and binds its context to an asynchronous
    /// lifecycle, entered on the calling thread.
    pub fn start_async<E, S, L>(
        &self,
        headers: &E,
        store: S,
        listener: L,
    ) -> (ResolvedCorrelation, AsyncLifecycle<S>, LifecycleScope<S>)
    where
        E: HeaderExtractor + ?Sized,
        S: ContextStore,
        L: LifecycleListener + 'static,
    {
        let resolved = self.correlate(headers);
        let (lifecycle, scope) =
            AsyncLifecycle::start(resolved.span_context.clone(), store, listener);
        (resolved, lifecycle, scope)
    }

    /// Returns this component's appId, if the resolver knows it yet.
    pub fn self_app_id(&self) -> Option<String> {
        let Some(key) = self.config.instrumentation_key() else {
            tracing::trace!("no instrumentation key configured, appId unknown");
            return None;
        };
        self.resolver.resolve(key).filter(|app_id| !app_id.is_empty())
    }

    /// Returns the caller's appId from `Request-Context` when it names
    /// another component.
    pub fn resolve_source<E: HeaderExtractor + ?Sized>(&self, headers: &E) -> Option<String> {
        let request_context = headers.get_non_empty(REQUEST_CONTEXT)?;
        let self_app_id = self.self_app_id();
        match try_resolve_target(request_context, self_app_id.as_deref()) {
            Ok(source) => Some(source),
            Err(error) => {
                tracing::debug!(request_context, %error, "request source not resolved");
                None
            }
        }
    }

    /// Adds `Request-Context: appId=<self>` to a response.
    ///
    /// Returns `false` without touching the response when it already has
    /// the header or our appId is not known yet.
    pub fn inject_response_headers<I: HeaderInjector + ?Sized>(&self, injector: &mut I) -> bool {
        if injector.contains(REQUEST_CONTEXT) {
            return false;
        }
        let value = build_request_context_header(self.self_app_id().as_deref());
        if value.is_empty() {
            return false;
        }
        injector.set(REQUEST_CONTEXT, value);
        true
    }

    fn extract_traceparent<E: HeaderExtractor + ?Sized>(&self, headers: &E) -> Option<SpanContext> {
        let traceparent = headers.get_non_empty(TRACEPARENT)?;
        match W3CTraceContext::new(self.config.max_tracestate_members).extract(headers) {
            Ok(parent) => Some(parent),
            Err(error) => {
                tracing::debug!(header = traceparent, %error, "ignoring malformed traceparent");
                None
            }
        }
    }

    fn extract_legacy<E: HeaderExtractor + ?Sized>(
        &self,
        headers: &E,
        properties: &mut BTreeMap<String, String>,
    ) -> Option<(SpanContext, String)> {
        let raw = headers.get_non_empty(REQUEST_ID)?;
        if !self.config.legacy_compat {
            tracing::trace!(request_id = raw, "legacy compatibility off, ignoring Request-Id");
            return None;
        }

        let legacy = codec::parse_legacy_request_id(raw);
        let trace_id = match legacy.root_trace_id() {
            Ok(trace_id) => trace_id,
            Err(error) => {
                tracing::debug!(root = %legacy.root, %error, "legacy root is not a trace id");
                properties.insert(LEGACY_ROOT_ID_PROPERTY.to_string(), legacy.root.clone());
                self.ids.trace_id()
            }
        };

        Some((SpanContext::new(trace_id, self.ids.span_id()), legacy.raw))
    }
}
