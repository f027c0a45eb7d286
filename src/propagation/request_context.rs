//! `Request-Context` handling: appId exchange between components.

use std::sync::Arc;

use crate::codec::try_parse_request_context_app_id;
use crate::error::{Error, ErrorKind, Result};
use crate::propagation::REQUEST_CONTEXT_APP_ID_KEY;

/// Resolves a component's appId from its instrumentation key.
///
/// Resolution is typically asynchronous and happens elsewhere; `None` means
/// the answer is still pending or resolution failed. Callers treat it as
/// "no appId known" and retry on the next request.
pub trait AppIdResolver: Send + Sync {
    /// Returns the appId for `instrumentation_key`, if known.
    fn resolve(&self, instrumentation_key: &str) -> Option<String>;
}

impl<R: AppIdResolver + ?Sized> AppIdResolver for Arc<R> {
    fn resolve(&self, instrumentation_key: &str) -> Option<String> {
        (**self).resolve(instrumentation_key)
    }
}

impl<R: AppIdResolver + ?Sized> AppIdResolver for &R {
    fn resolve(&self, instrumentation_key: &str) -> Option<String> {
        (**self).resolve(instrumentation_key)
    }
}

/// A resolver that never knows any appId.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAppIdResolver;

impl AppIdResolver for NoAppIdResolver {
    fn resolve(&self, _instrumentation_key: &str) -> Option<String> {
        None
    }
}

/// Formats the `Request-Context` value `appId=<self>`.
///
/// Returns an empty string when our appId is unresolved, rather than
/// emitting a placeholder.
///
/// ```rust
/// use trace_correlation::propagation::build_request_context_header;
///
/// assert_eq!(build_request_context_header(Some("cid-v1:abc")), "appId=cid-v1:abc");
/// assert_eq!(build_request_context_header(None), "");
/// ```
pub fn build_request_context_header(self_app_id: Option<&str>) -> String {
    match resolved(self_app_id) {
        Some(app_id) => format!("{}={}", REQUEST_CONTEXT_APP_ID_KEY, app_id),
        None => {
            tracing::trace!("appId could not be retrieved yet, omitting request context");
            String::new()
        }
    }
}

/// Returns the remote appId from a `Request-Context` value when it differs
/// from ours.
pub fn try_resolve_target(request_context: &str, self_app_id: Option<&str>) -> Result<String> {
    let remote = try_parse_request_context_app_id(request_context)?;
    let current = resolved(self_app_id).ok_or_else(|| Error::from_kind(ErrorKind::AppIdUnresolved))?;
    if remote == current {
        return Err(Error::from_kind(ErrorKind::SelfCall));
    }
    Ok(remote.to_string())
}

/// Returns the remote appId from a `Request-Context` value, or an empty
/// string when it cannot be trusted.
///
/// Empty means "no target known": the value is malformed, carries no appId,
/// names ourselves, or our own appId is unresolved.
///
/// ```rust
/// use trace_correlation::propagation::resolve_target;
///
/// let me = Some("cid-v1:defaultId");
/// assert_eq!(resolve_target("appId=cid-v1:xyz", me), "cid-v1:xyz");
/// assert_eq!(resolve_target("appId=cid-v1:defaultId", me), "");
/// assert_eq!(resolve_target("k=v", me), "");
/// ```
pub fn resolve_target(request_context: &str, self_app_id: Option<&str>) -> String {
    if request_context.is_empty() {
        tracing::trace!("request context is empty, no target");
        return String::new();
    }
    match try_resolve_target(request_context, self_app_id) {
        Ok(target) => target,
        Err(error) => {
            tracing::debug!(request_context, %error, "no target resolved");
            String::new()
        }
    }
}

fn resolved(app_id: Option<&str>) -> Option<&str> {
    app_id.filter(|id| !id.is_empty())
}
