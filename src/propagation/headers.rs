//! Header access traits.

use std::collections::HashMap;

/// The W3C traceparent header name.
pub const TRACEPARENT: &str = "traceparent";
/// The W3C tracestate header name.
pub const TRACESTATE: &str = "tracestate";
/// The legacy hierarchical correlation header name.
pub const REQUEST_ID: &str = "Request-Id";
/// The header carrying the caller's or callee's appId.
pub const REQUEST_CONTEXT: &str = "Request-Context";
/// The key of the appId pair inside `Request-Context`.
pub const REQUEST_CONTEXT_APP_ID_KEY: &str = "appId";

/// A trait for extracting values from headers.
///
/// Header names are matched ASCII case-insensitively.
pub trait HeaderExtractor {
    /// Gets a header value by name.
    fn get(&self, key: &str) -> Option<&str>;

    /// Gets a header value by name, treating an empty value as absent.
    fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

/// A trait for injecting values into headers.
pub trait HeaderInjector {
    /// Sets a header value.
    fn set(&mut self, key: &str, value: String);

    /// Returns `true` if a header with this name is already present.
    fn contains(&self, key: &str) -> bool;
}

impl HeaderExtractor for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = HashMap::get(self, key) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

impl HeaderInjector for HashMap<String, String> {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key) || self.keys().any(|name| name.eq_ignore_ascii_case(key))
    }
}

impl<E: HeaderExtractor + ?Sized> HeaderExtractor for &E {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_extractor_for_hashmap() {
        let mut headers = HashMap::new();
        headers.insert("key".to_string(), "value".to_string());

        assert_eq!(HeaderExtractor::get(&headers, "key"), Some("value"));
        assert_eq!(HeaderExtractor::get(&headers, "missing"), None);
    }

    #[test]
    fn test_header_extractor_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("request-context".to_string(), "appId=cid-v1:xyz".to_string());

        assert_eq!(HeaderExtractor::get(&headers, REQUEST_CONTEXT), Some("appId=cid-v1:xyz"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let mut headers = HashMap::new();
        headers.insert(TRACEPARENT.to_string(), String::new());

        assert_eq!(HeaderExtractor::get(&headers, TRACEPARENT), Some(""));
        assert_eq!(headers.get_non_empty(TRACEPARENT), None);
    }

    #[test]
    fn test_header_injector_for_hashmap() {
        let mut headers: HashMap<String, String> = HashMap::new();
        HeaderInjector::set(&mut headers, "key", "value".to_string());
        assert_eq!(HashMap::get(&headers, "key"), Some(&"value".to_string()));
        assert!(HeaderInjector::contains(&headers, "KEY"));
        assert!(!HeaderInjector::contains(&headers, "other"));
    }
}
