//! Outbound side: propagation headers for dependency calls.
//!
//! Every outbound hop gets a new span id. The trace id and sampling decision
//! come from the ambient context; with none present the call is an orphaned
//! dependency and starts its own trace.
//!
//! | Header | Written when |
//! |--------|--------------|
//! | `traceparent` | always |
//! | `tracestate` | the ambient context has entries |
//! | `Request-Id` | legacy compatibility is on |
//! | `Request-Context` | our appId is resolved |

use crate::ambient::{ContextStore, ThreadLocalStore};
use crate::codec;
use crate::config::CorrelationConfig;
use crate::propagation::{
    AppIdResolver, HeaderInjector, NoAppIdResolver, REQUEST_CONTEXT, REQUEST_ID, TRACEPARENT,
    TRACESTATE, build_request_context_header, resolve_target,
};
use crate::telemetry::DependencyTelemetry;
use crate::trace_context::{IdGenerator, RandomIdGenerator, SpanContext};

/// Correlation values written for one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCorrelation {
    /// The dependency's id, `|trace.span.`, shared with the downstream parent id.
    pub id: String,
    /// The id of the ambient context the call was made from, if any.
    pub parent_id: Option<String>,
    /// The `traceparent` value sent.
    pub traceparent: String,
    /// The `tracestate` value sent, if any.
    pub tracestate: Option<String>,
    /// The context of the outbound call.
    pub span_context: SpanContext,
}

impl DependencyCorrelation {
    /// Writes the dependency's ids into its record.
    pub fn apply_to(&self, dependency: &mut DependencyTelemetry) {
        dependency.id = self.id.clone();
        dependency.operation.id = Some(self.span_context.trace_id().to_hex());
        dependency.operation.parent_id = self.parent_id.clone();
    }
}

/// Builds propagation headers from the ambient context.
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use trace_correlation::{
///     CorrelationConfig, SpanContext,
///     ambient::{ContextStore, ThreadLocalStore},
///     outbound::OutboundCorrelator,
/// };
///
/// let ctx = SpanContext::new_root().with_sampled(true);
/// let _scope = ThreadLocalStore.enter_scoped(ctx.clone());
///
/// let correlator = OutboundCorrelator::new(CorrelationConfig::default());
/// let mut headers: HashMap<String, String> = HashMap::new();
/// let dependency = correlator.inject(&mut headers);
///
/// assert!(dependency.traceparent.starts_with(&format!("00-{}-", ctx.trace_id())));
/// assert!(dependency.traceparent.ends_with("-01"));
/// assert_eq!(headers["Request-Id"], dependency.id);
/// ```
#[derive(Debug, Clone)]
pub struct OutboundCorrelator<S = ThreadLocalStore, G = RandomIdGenerator, R = NoAppIdResolver> {
    config: CorrelationConfig,
    store: S,
    ids: G,
    resolver: R,
}

impl OutboundCorrelator {
    /// Creates a correlator over the thread-local store with random ids and
    /// no appId resolver.
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config, store: ThreadLocalStore, ids: RandomIdGenerator, resolver: NoAppIdResolver }
    }
}

impl<S: ContextStore, G: IdGenerator, R: AppIdResolver> OutboundCorrelator<S, G, R> {
    /// Replaces the ambient store.
    pub fn with_store<S2: ContextStore>(self, store: S2) -> OutboundCorrelator<S2, G, R> {
        OutboundCorrelator { config: self.config, store, ids: self.ids, resolver: self.resolver }
    }

    /// Replaces the id generator.
    pub fn with_id_generator<G2: IdGenerator>(self, ids: G2) -> OutboundCorrelator<S, G2, R> {
        OutboundCorrelator { config: self.config, store: self.store, ids, resolver: self.resolver }
    }

    /// Replaces the appId resolver.
    pub fn with_resolver<R2: AppIdResolver>(self, resolver: R2) -> OutboundCorrelator<S, G, R2> {
        OutboundCorrelator { config: self.config, store: self.store, ids: self.ids, resolver }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Returns the context for a new outbound call.
    ///
    /// A child of the ambient context, or a new root with default flags.
    pub fn next_context(&self) -> SpanContext {
        self.child_of(self.ambient().as_ref())
    }

    fn ambient(&self) -> Option<SpanContext> {
        self.store.current().filter(SpanContext::is_valid)
    }

    fn child_of(&self, parent: Option<&SpanContext>) -> SpanContext {
        match parent {
            Some(ctx) => ctx.child(&self.ids),
            None => {
                tracing::trace!("no ambient context, outbound call starts a new trace");
                SpanContext::new_root_with(&self.ids)
            }
        }
    }

    /// Returns a `traceparent` value for a new outbound call.
    pub fn build_traceparent(&self) -> String {
        self.next_context().to_traceparent()
    }

    /// Returns the `Request-Context` value `appId=<self>`, or an empty string
    /// while our appId is unresolved.
    pub fn build_request_context_header(&self) -> String {
        build_request_context_header(self.self_app_id().as_deref())
    }

    /// Returns the callee's appId from its response `Request-Context`, or an
    /// empty string when it is unknown or ourselves.
    pub fn target_for(&self, response_request_context: &str) -> String {
        resolve_target(response_request_context, self.self_app_id().as_deref())
    }

    /// Returns the ambient `tracestate` value, if there is one with entries.
    pub fn tracestate_as_string(&self) -> Option<String> {
        self.store
            .current()
            .map(|ctx| ctx.trace_state().clone())
            .filter(|state| !state.is_empty())
            .map(|state| state.to_header())
    }

    /// Returns this component's appId, if the resolver knows it yet.
    pub fn self_app_id(&self) -> Option<String> {
        let key = self.config.instrumentation_key()?;
        self.resolver.resolve(key).filter(|app_id| !app_id.is_empty())
    }

    /// Writes propagation headers for one outbound call.
    ///
    /// All headers share one fresh span id, which is also the returned
    /// dependency id.
    pub fn inject<I: HeaderInjector + ?Sized>(&self, injector: &mut I) -> DependencyCorrelation {
        let parent = self.ambient();
        let span_context = self.child_of(parent.as_ref());
        let parent_id = parent.as_ref().map(SpanContext::to_legacy_id);
        let traceparent = span_context.to_traceparent();
        let tracestate = Some(span_context.trace_state())
            .filter(|state| !state.is_empty())
            .map(|state| state.to_header());
        let id = codec::format_legacy_id(span_context.trace_id(), span_context.span_id());

        injector.set(TRACEPARENT, traceparent.clone());
        if let Some(ref tracestate) = tracestate {
            injector.set(TRACESTATE, tracestate.clone());
        }
        if self.config.legacy_compat {
            injector.set(REQUEST_ID, id.clone());
        }
        let request_context = self.build_request_context_header();
        if !request_context.is_empty() {
            injector.set(REQUEST_CONTEXT, request_context);
        }

        tracing::trace!(%traceparent, "injected outbound correlation headers");

        DependencyCorrelation { id, parent_id, traceparent, tracestate, span_context }
    }
}
