//! Stamping records with the ambient context.

use super::Telemetry;
use crate::ambient::{ContextStore, ThreadLocalStore};

/// Fills in correlation fields from the context current where a record is
/// created.
///
/// A record without an operation id gets the ambient trace id, and the
/// ambient context as its parent unless it already names one. A record that
/// already carries an operation id keeps its parent as is, so a request
/// record stamped from its own correlation never becomes its own parent.
/// Request and dependency records also receive the tracestate entries whose
/// keys they do not already have. Without a valid ambient context the record
/// is left untouched.
///
/// ## Example
///
/// ```rust
/// use trace_correlation::{
///     SpanContext,
///     ambient::{ContextStore, ThreadLocalStore},
///     telemetry::{ContextInitializer, Telemetry, TraceTelemetry},
/// };
///
/// let ctx = SpanContext::new_root();
/// let _scope = ThreadLocalStore.enter_scoped(ctx.clone());
///
/// let mut record = TraceTelemetry::new("cache miss");
/// ContextInitializer::default().initialize(&mut record);
/// assert_eq!(record.operation().id, Some(ctx.trace_id().to_hex()));
/// ```
#[derive(Debug, Clone)]
pub struct ContextInitializer<S: ContextStore = ThreadLocalStore> {
    store: S,
}

impl Default for ContextInitializer {
    fn default() -> Self {
        Self::new(ThreadLocalStore)
    }
}

impl<S: ContextStore> ContextInitializer<S> {
    /// Creates an initializer reading from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stamps `telemetry` with the current context.
    pub fn initialize<T: Telemetry + ?Sized>(&self, telemetry: &mut T) {
        let Some(ctx) = self.store.current().filter(|ctx| ctx.is_valid()) else {
            return;
        };

        let operation = telemetry.operation_mut();
        if operation.id_is_empty() {
            operation.id = Some(ctx.trace_id().to_hex());
            if operation.parent_id_is_empty() {
                operation.parent_id = Some(ctx.to_legacy_id());
            }
        }

        if telemetry.kind().carries_trace_state() {
            let properties = telemetry.properties_mut();
            for (key, value) in ctx.trace_state().to_properties() {
                properties.entry(key).or_insert(value);
            }
        }
    }
}
