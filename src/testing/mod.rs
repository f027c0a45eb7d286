//! Deterministic collaborators for testing correlation code.
//!
//! - [`SequenceIdGenerator`]: predictable, counting ids
//! - [`FixedAppIdResolver`]: an appId resolver you control
//! - [`RecordingListener`]: a lifecycle listener that remembers outcomes
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use trace_correlation::{
//!     CorrelationConfig,
//!     inbound::InboundCorrelator,
//!     testing::SequenceIdGenerator,
//! };
//!
//! let correlator = InboundCorrelator::new(CorrelationConfig::default())
//!     .with_id_generator(SequenceIdGenerator::new());
//!
//! let resolved = correlator.correlate(&HashMap::<String, String>::new());
//! assert_eq!(resolved.operation_id, "00000000000000000000000000000001");
//! assert_eq!(resolved.self_id, "|00000000000000000000000000000001.0000000000000001.");
//! ```

mod ids;
mod listener;
mod resolver;

pub use ids::SequenceIdGenerator;
pub use listener::RecordingListener;
pub use resolver::FixedAppIdResolver;
