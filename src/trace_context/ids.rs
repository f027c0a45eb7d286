//! Trace and span identifiers.

use std::fmt;

use crate::error::{Error, ErrorKind, Result};
use crate::trace_context::{IdGenerator, RandomIdGenerator};

/// Returns `true` if `s` is exactly `len` characters from `[0-9a-f]`.
///
/// Uppercase hex is rejected: the wire formats are lowercase only.
pub(crate) fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A 128-bit trace identifier.
///
/// Rendered as 32 lowercase hex characters. The all-zero value is the
/// "invalid" trace id and is never produced by parsing or generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId([u8; 16]);

impl TraceId {
    /// The all-zero, invalid trace id.
    pub const INVALID: Self = Self([0u8; 16]);

    /// Creates a new random trace ID.
    pub fn random() -> Self {
        RandomIdGenerator.trace_id()
    }

    /// Creates a trace ID from bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a trace ID from a 32 character lowercase hex string.
    ///
    /// ```rust
    /// use trace_correlation::TraceId;
    ///
    /// let id = TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap();
    /// assert_eq!(id.to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
    ///
    /// assert!(TraceId::from_hex("4BF92F3577B34DA6A3CE929D0E0E4736").is_err());
    /// assert!(TraceId::from_hex("00000000000000000000000000000000").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        if !is_lower_hex(hex, 32) {
            return Err(Error::from_kind(ErrorKind::InvalidTraceId));
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| Error::from_kind(ErrorKind::InvalidTraceId).with_source(e))?;

        if bytes == [0u8; 16] {
            return Err(Error::invalid_trace_id("trace id must not be all zeros"));
        }

        Ok(Self(bytes))
    }

    /// Returns the trace ID as bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns `false` for the all-zero trace id.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Returns the lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceId({})", self)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A 64-bit span identifier, rendered as 16 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId([u8; 8]);

impl SpanId {
    /// The all-zero, invalid span id.
    pub const INVALID: Self = Self([0u8; 8]);

    /// Creates a new random span ID.
    pub fn random() -> Self {
        RandomIdGenerator.span_id()
    }

    /// Creates a span ID from bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Creates a span ID from a 16 character lowercase hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if !is_lower_hex(hex, 16) {
            return Err(Error::from_kind(ErrorKind::InvalidSpanId));
        }
        let mut bytes = [0u8; 8];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| Error::from_kind(ErrorKind::InvalidSpanId).with_source(e))?;

        if bytes == [0u8; 8] {
            return Err(Error::invalid_span_id("span id must not be all zeros"));
        }

        Ok(Self(bytes))
    }

    /// Returns the span ID as bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Returns the lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpanId({})", self)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Trace flags as defined by W3C Trace Context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// The trace is sampled.
    pub const SAMPLED: Self = Self(0x01);

    /// Creates trace flags from a raw byte.
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Creates trace flags from a 2 character lowercase hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if !is_lower_hex(hex, 2) {
            return Err(Error::from_kind(ErrorKind::InvalidFlags));
        }
        let value = u8::from_str_radix(hex, 16)
            .map_err(|_| Error::from_kind(ErrorKind::InvalidFlags))?;
        Ok(Self(value))
    }

    /// Returns `true` if the sampled flag is set.
    pub fn is_sampled(&self) -> bool {
        self.0 & Self::SAMPLED.0 != 0
    }

    /// Returns a copy with the sampled flag set or cleared.
    #[must_use]
    pub fn with_sampled(self, sampled: bool) -> Self {
        if sampled {
            self | Self::SAMPLED
        } else {
            Self(self.0 & !Self::SAMPLED.0)
        }
    }

    /// Returns the raw flag value.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for TraceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

impl std::ops::BitOr for TraceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
