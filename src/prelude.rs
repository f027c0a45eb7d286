//! Prelude module for convenient imports.
//!
//! ```rust
//! use trace_correlation::prelude::*;
//! ```
//!
//! This provides access to:
//! - Identity types and the id generator trait
//! - The inbound and outbound correlators
//! - Ambient stores and the lifecycle adapter
//! - Header traits, telemetry records and error types

pub use crate::{
    ambient::{ContextStore, ScopeGuard, ScopeHandle, TaskLocalStore, ThreadLocalStore},
    config::CorrelationConfig,
    error::{Error, ErrorKind, Result},
    inbound::{CorrelationPath, InboundCorrelator, ResolvedCorrelation},
    lifecycle::{AsyncLifecycle, LifecycleListener, LifecycleScope, LifecycleState, Outcome},
    outbound::{DependencyCorrelation, OutboundCorrelator},
    propagation::{AppIdResolver, HeaderExtractor, HeaderInjector},
    telemetry::{ContextInitializer, Telemetry, TelemetryRecord},
    trace_context::{IdGenerator, SpanContext, SpanId, TraceFlags, TraceId, TraceState},
};
