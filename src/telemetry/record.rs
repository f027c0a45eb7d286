//! Telemetry records and the capability interface they share.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lifecycle::Outcome;

/// The correlation fields every record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    /// The operation (trace) id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The id of the caller's record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl OperationContext {
    /// Returns `true` if no operation id is set.
    pub fn id_is_empty(&self) -> bool {
        self.id.as_deref().is_none_or(str::is_empty)
    }

    /// Returns `true` if no parent id is set.
    pub fn parent_id_is_empty(&self) -> bool {
        self.parent_id.as_deref().is_none_or(str::is_empty)
    }
}

/// The variant of a telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryKind {
    /// An inbound request.
    Request,
    /// An outbound dependency call.
    Dependency,
    /// A log message.
    Trace,
    /// A captured error.
    Exception,
}

impl TelemetryKind {
    /// Returns `true` for records that carry propagated tracestate.
    pub fn carries_trace_state(self) -> bool {
        matches!(self, Self::Request | Self::Dependency)
    }
}

/// What the correlation layer needs from any telemetry record.
pub trait Telemetry {
    /// Returns the record's variant.
    fn kind(&self) -> TelemetryKind;

    /// Returns the custom properties, ordered by key.
    fn properties(&self) -> &BTreeMap<String, String>;

    /// Returns the custom properties for modification.
    fn properties_mut(&mut self) -> &mut BTreeMap<String, String>;

    /// Returns the correlation fields.
    fn operation(&self) -> &OperationContext;

    /// Returns the correlation fields for modification.
    fn operation_mut(&mut self) -> &mut OperationContext;

    /// Inserts every entry whose key is not already present.
    fn merge_properties<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
        Self: Sized,
    {
        let properties = self.properties_mut();
        for (key, value) in entries {
            properties.entry(key).or_insert(value);
        }
    }
}

/// An inbound request handled by this component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTelemetry {
    /// This request's own id, `|trace.span.`.
    pub id: String,
    /// The request name, usually method and route.
    pub name: String,
    /// The caller's appId when it identified itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The response status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
    /// Whether the request succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Correlation fields.
    pub operation: OperationContext,
    /// Custom properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RequestTelemetry {
    /// Creates a request record with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Records how the request ended.
    pub fn record_outcome(&mut self, outcome: &Outcome) {
        self.success = Some(outcome.is_success());
        match outcome {
            Outcome::Completed { status_code } => self.response_code = Some(*status_code),
            Outcome::TimedOut => {
                self.properties.insert("timeout".to_string(), "true".to_string());
            }
            Outcome::Errored { message } => {
                self.properties.insert("error".to_string(), message.clone());
            }
        }
    }
}

/// An outbound call made while handling work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTelemetry {
    /// The id sent downstream, `|trace.span.`.
    pub id: String,
    /// The dependency name, usually method and path.
    pub name: String,
    /// The callee, by appId when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// The dependency type, such as `Http`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    /// Correlation fields.
    pub operation: OperationContext,
    /// Custom properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl DependencyTelemetry {
    /// Creates a dependency record with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// A log message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceTelemetry {
    /// The message text.
    pub message: String,
    /// Correlation fields.
    pub operation: OperationContext,
    /// Custom properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl TraceTelemetry {
    /// Creates a trace record with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }
}

/// A captured error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionTelemetry {
    /// The error's type name.
    pub type_name: String,
    /// The error message.
    pub message: String,
    /// Correlation fields.
    pub operation: OperationContext,
    /// Custom properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ExceptionTelemetry {
    /// Creates an exception record.
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), message: message.into(), ..Self::default() }
    }
}

macro_rules! impl_telemetry {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Telemetry for $ty {
                fn kind(&self) -> TelemetryKind {
                    TelemetryKind::$kind
                }

                fn properties(&self) -> &BTreeMap<String, String> {
                    &self.properties
                }

                fn properties_mut(&mut self) -> &mut BTreeMap<String, String> {
                    &mut self.properties
                }

                fn operation(&self) -> &OperationContext {
                    &self.operation
                }

                fn operation_mut(&mut self) -> &mut OperationContext {
                    &mut self.operation
                }
            }
        )*
    };
}

impl_telemetry! {
    RequestTelemetry => Request,
    DependencyTelemetry => Dependency,
    TraceTelemetry => Trace,
    ExceptionTelemetry => Exception,
}

/// Any telemetry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryRecord {
    /// An inbound request.
    Request(RequestTelemetry),
    /// An outbound call.
    Dependency(DependencyTelemetry),
    /// A log message.
    Trace(TraceTelemetry),
    /// A captured error.
    Exception(ExceptionTelemetry),
}

impl TelemetryRecord {
    fn as_dyn(&self) -> &dyn Telemetry {
        match self {
            Self::Request(t) => t,
            Self::Dependency(t) => t,
            Self::Trace(t) => t,
            Self::Exception(t) => t,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Telemetry {
        match self {
            Self::Request(t) => t,
            Self::Dependency(t) => t,
            Self::Trace(t) => t,
            Self::Exception(t) => t,
        }
    }
}

impl Telemetry for TelemetryRecord {
    fn kind(&self) -> TelemetryKind {
        self.as_dyn().kind()
    }

    fn properties(&self) -> &BTreeMap<String, String> {
        self.as_dyn().properties()
    }

    fn properties_mut(&mut self) -> &mut BTreeMap<String, String> {
        self.as_dyn_mut().properties_mut()
    }

    fn operation(&self) -> &OperationContext {
        self.as_dyn().operation()
    }

    fn operation_mut(&mut self) -> &mut OperationContext {
        self.as_dyn_mut().operation_mut()
    }
}

impl From<RequestTelemetry> for TelemetryRecord {
    fn from(t: RequestTelemetry) -> Self {
        Self::Request(t)
    }
}

impl From<DependencyTelemetry> for TelemetryRecord {
    fn from(t: DependencyTelemetry) -> Self {
        Self::Dependency(t)
    }
}

impl From<TraceTelemetry> for TelemetryRecord {
    fn from(t: TraceTelemetry) -> Self {
        Self::Trace(t)
    }
}

impl From<ExceptionTelemetry> for TelemetryRecord {
    fn from(t: ExceptionTelemetry) -> Self {
        Self::Exception(t)
    }
}
