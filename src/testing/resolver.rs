//! Controllable appId resolver.

use parking_lot::RwLock;

use crate::propagation::AppIdResolver;

/// Answers every instrumentation key with one appId, or with nothing while
/// "pending".
///
/// The answer can be changed at runtime to simulate resolution finishing.
#[derive(Debug, Default)]
pub struct FixedAppIdResolver {
    app_id: RwLock<Option<String>>,
}

impl FixedAppIdResolver {
    /// Creates a resolver answering `app_id`.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self { app_id: RwLock::new(Some(app_id.into())) }
    }

    /// Creates a resolver whose answer is still pending.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Sets the answer; `None` makes it pending again.
    pub fn set(&self, app_id: Option<String>) {
        *self.app_id.write() = app_id;
    }
}

impl AppIdResolver for FixedAppIdResolver {
    fn resolve(&self, _instrumentation_key: &str) -> Option<String> {
        self.app_id.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_then_resolved() {
        let resolver = FixedAppIdResolver::pending();
        assert_eq!(resolver.resolve("ikey"), None);

        resolver.set(Some("cid-v1:me".to_string()));
        assert_eq!(resolver.resolve("ikey").as_deref(), Some("cid-v1:me"));
    }
}
