//! The outcome of inbound correlation.

use std::collections::BTreeMap;
use std::fmt;

use crate::telemetry::{RequestTelemetry, Telemetry};
use crate::trace_context::SpanContext;

/// Property recording a legacy root that was not a valid trace id.
pub const LEGACY_ROOT_ID_PROPERTY: &str = "ai_legacyRootId";

/// Which protocol supplied the request's trace identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationPath {
    /// A valid W3C `traceparent` header.
    TraceParent,
    /// A legacy `Request-Id` header.
    Legacy,
    /// Nothing usable; a new trace was started.
    Fresh,
}

impl fmt::Display for CorrelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TraceParent => "traceparent",
            Self::Legacy => "legacy",
            Self::Fresh => "fresh",
        })
    }
}

/// Identity resolved for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCorrelation {
    /// The operation id: the trace id as 32 lowercase hex characters.
    pub operation_id: String,
    /// The caller's id, `|trace.span.` or the raw legacy header.
    pub parent_id: Option<String>,
    /// This request's own id, `|trace.span.`.
    pub self_id: String,
    /// Properties for the request record.
    pub properties: BTreeMap<String, String>,
    /// The caller's appId, when it identified itself as another component.
    pub source: Option<String>,
    /// The protocol that supplied the identity.
    pub path: CorrelationPath,
    /// The request's own context, to be entered into the ambient store.
    pub span_context: SpanContext,
}

impl ResolvedCorrelation {
    /// Returns the legacy root kept because it was not a trace id.
    pub fn legacy_root_id(&self) -> Option<&str> {
        self.properties.get(LEGACY_ROOT_ID_PROPERTY).map(String::as_str)
    }

    /// Writes ids, source and properties into a request record.
    ///
    /// Properties already on the record are kept.
    pub fn apply_to(&self, request: &mut RequestTelemetry) {
        request.id = self.self_id.clone();
        request.operation.id = Some(self.operation_id.clone());
        request.operation.parent_id = self.parent_id.clone();
        if self.source.is_some() {
            request.source = self.source.clone();
        }
        request.merge_properties(self.properties.clone());
    }
}
