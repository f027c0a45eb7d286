//! Inbound side: resolving a request's trace identity from its headers.

mod correlator;
mod resolved;

pub use correlator::InboundCorrelator;
pub use resolved::{CorrelationPath, LEGACY_ROOT_ID_PROPERTY, ResolvedCorrelation};
