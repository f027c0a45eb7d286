//! Header propagation.
//!
//! - [`HeaderExtractor`] / [`HeaderInjector`]: access to request and response headers
//! - [`W3CTraceContext`]: `traceparent` / `tracestate` propagation
//! - [`resolve_target`] / [`build_request_context_header`]: appId exchange over
//!   `Request-Context`
//!
//! ## Headers
//!
//! | Header            | Direction         | Format                      |
//! |-------------------|-------------------|-----------------------------|
//! | `traceparent`     | inbound, outbound | `vv-32hex-16hex-2hex`       |
//! | `tracestate`      | inbound, outbound | `key=value[,key=value]*`    |
//! | `Request-Id`      | inbound, outbound | `\|root.seg.seg...` (legacy) |
//! | `Request-Context` | inbound, response | `appId=<value>`             |

mod headers;
mod request_context;
mod w3c;

pub use headers::{
    HeaderExtractor, HeaderInjector, REQUEST_CONTEXT, REQUEST_CONTEXT_APP_ID_KEY, REQUEST_ID,
    TRACEPARENT, TRACESTATE,
};
pub use request_context::{
    AppIdResolver, NoAppIdResolver, build_request_context_header, resolve_target,
    try_resolve_target,
};
pub use w3c::{Propagator, W3CTraceContext};
