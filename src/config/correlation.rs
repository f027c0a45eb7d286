//! Correlation protocol configuration.

/// Maximum number of tracestate members kept on parse (W3C Trace Context limit).
pub const DEFAULT_MAX_TRACESTATE_MEMBERS: usize = 32;

/// Configuration for inbound and outbound correlation.
///
/// Read-only once built. Correlators take it by value.
///
/// ## Legacy Compatibility
///
/// When `legacy_compat` is on (the default), an inbound request with no usable
/// `traceparent` is continued from its legacy `Request-Id` header, and outbound
/// calls carry a legacy `Request-Id` next to `traceparent`. When off, legacy
/// headers are ignored as if absent.
///
/// ## Example
///
/// ```rust
/// use trace_correlation::CorrelationConfig;
///
/// let config = CorrelationConfig::builder()
///     .legacy_compat(false)
///     .instrumentation_key("00000000-0000-0000-0000-000000000000")
///     .build();
///
/// assert!(!config.legacy_compat);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct CorrelationConfig {
    /// Whether the legacy `Request-Id` protocol is honored.
    #[builder(default = true)]
    pub legacy_compat: bool,

    /// Instrumentation key of this component, handed to the appId resolver.
    #[builder(into)]
    pub instrumentation_key: Option<String>,

    /// Tracestate members beyond this count are dropped on parse.
    #[builder(default = DEFAULT_MAX_TRACESTATE_MEMBERS)]
    pub max_tracestate_members: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CorrelationConfig {
    /// Creates a configuration with the legacy protocol disabled.
    pub fn w3c_only() -> Self {
        Self::builder().legacy_compat(false).build()
    }

    /// Returns the instrumentation key, treating an empty key as unset.
    pub fn instrumentation_key(&self) -> Option<&str> {
        self.instrumentation_key.as_deref().filter(|key| !key.is_empty())
    }
}
