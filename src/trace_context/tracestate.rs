//! W3C tracestate entries.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind, Result};

/// Vendor-specific key/value propagation data carried next to `traceparent`.
///
/// Entries keep their construction order, which is also the emission order.
/// Duplicate keys are kept as-is; only lookups and the flattened property
/// view resolve them, with the last occurrence winning.
///
/// ## Example
///
/// ```rust
/// use trace_correlation::TraceState;
///
/// let state = TraceState::parse("k1=v1, k2=v2,k1=v3", 32);
/// assert_eq!(state.to_header(), "k1=v1,k2=v2,k1=v3");
/// assert_eq!(state.get("k1"), Some("v3"));
/// assert_eq!(state.to_properties()["k1"], "v3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceState {
    entries: Vec<(String, String)>,
}

impl TraceState {
    /// Creates an empty trace state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `tracestate` header value.
    ///
    /// Malformed members are skipped; members past `max_members` are dropped.
    pub fn parse(header: &str, max_members: usize) -> Self {
        let mut entries = Vec::new();
        for member in header.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            if entries.len() >= max_members {
                tracing::debug!(max_members, "tracestate member limit reached, dropping the rest");
                break;
            }
            match parse_member(member) {
                Ok((key, value)) => entries.push((key.to_string(), value.to_string())),
                Err(error) => tracing::debug!(member, %error, "skipping tracestate member"),
            }
        }
        Self { entries }
    }

    /// Appends an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends an entry, keeping construction order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the value of the last entry with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates entries in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the header value in construction order.
    pub fn to_header(&self) -> String {
        crate::codec::format_tracestate(self.iter())
    }

    /// Flattens into a property map, last write wins per key.
    pub fn to_properties(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

fn parse_member(member: &str) -> Result<(&str, &str)> {
    let (key, value) = member
        .split_once('=')
        .ok_or_else(|| Error::new(ErrorKind::InvalidTraceState, "member has no '='"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::new(ErrorKind::InvalidTraceState, "member has an empty key"));
    }
    Ok((key, value.trim()))
}
