//! # trace-correlation
//!
//! Distributed trace identity for telemetry agents: resolve it from inbound
//! headers, keep it ambient while the request runs, and propagate it on
//! outbound calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use trace_correlation::prelude::*;
//!
//! let config = CorrelationConfig::default();
//! let inbound = InboundCorrelator::new(config.clone());
//! let outbound = OutboundCorrelator::new(config);
//! let store = ThreadLocalStore;
//!
//! // Request arrives
//! let mut request: HashMap<String, String> = HashMap::new();
//! request.insert(
//!     "traceparent".into(),
//!     "00-0123456789abcdef0123456789abcdef-0123456789abcdef-01".into(),
//! );
//! let (resolved, handle) = inbound.start_request_scope(&request, &store);
//! assert_eq!(resolved.operation_id, "0123456789abcdef0123456789abcdef");
//!
//! // Downstream call made while handling it
//! let mut downstream: HashMap<String, String> = HashMap::new();
//! let dependency = outbound.inject(&mut downstream);
//! assert!(dependency.traceparent.starts_with("00-0123456789abcdef0123456789abcdef-"));
//!
//! // Request finished
//! store.release(handle);
//! ```
//!
//! ## Key Concepts
//!
//! - **Inbound**: `traceparent` first, then legacy `Request-Id`, then a new
//!   trace. Malformed headers fall through, never fail the request.
//! - **Ambient context**: a per-thread or per-task slot with nested
//!   enter/release scopes.
//! - **Outbound**: every hop gets a new span id under the ambient trace.
//! - **Lifecycle**: asynchronous requests end exactly once, on any thread.
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`]. The crate installs no subscriber.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Identity and wire formats
pub mod codec;
pub mod config;
pub mod error;
pub mod propagation;
pub mod trace_context;

// Correlation
pub mod ambient;
pub mod inbound;
pub mod lifecycle;
pub mod outbound;
pub mod telemetry;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::CorrelationConfig;
pub use error::{Error, ErrorKind, Result};
pub use trace_context::{IdGenerator, RandomIdGenerator, SpanContext, SpanId, TraceFlags, TraceId, TraceState};
