//! Telemetry records and correlation stamping.
//!
//! The records here are a thin data model: just enough structure for the
//! correlation layer to set operation ids, parent ids and properties.
//! Serialization to an ingestion format is left to the caller.

mod initializer;
mod record;

pub use initializer::ContextInitializer;
pub use record::{
    DependencyTelemetry, ExceptionTelemetry, OperationContext, RequestTelemetry, Telemetry,
    TelemetryKind, TelemetryRecord, TraceTelemetry,
};
