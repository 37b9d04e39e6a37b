//! Tagged secret values.
//!
//! The local cache accepts any [`SecretValue`]; the remote write path only
//! accepts [`SecretValue::Text`]. Keeping the kinds explicit lets the facade
//! reject other shapes with a plain match instead of a runtime type check.

use std::fmt;

use super::types::SecretString;

/// A secret payload.
#[derive(Clone, PartialEq)]
pub enum SecretValue {
    /// String payload, accepted by both the local cache and the remote backend.
    Text(SecretString),
    /// Raw bytes. Local cache only.
    Bytes(Vec<u8>),
    /// Any other shape (numbers, booleans, maps, lists). Local cache only.
    Structured(serde_json::Value),
}

impl SecretValue {
    /// Short name of the value kind, used in diagnostics and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Structured(_) => "structured",
        }
    }

    /// Whether the value can be written to the remote backend.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.expose_secret()),
            _ => None,
        }
    }

    /// Borrow the byte payload, if this is a bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Borrow the structured payload, if this is a structured value.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    /// Take the text payload, if this is a text value.
    pub fn into_text(self) -> Option<SecretString> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => write!(f, "Bytes([REDACTED; {} bytes])", bytes.len()),
            Self::Structured(_) => write!(f, "Structured([REDACTED])"),
        }
    }
}

impl From<SecretString> for SecretValue {
    fn from(value: SecretString) -> Self {
        Self::Text(value)
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::Text(SecretString::new(value))
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::Text(SecretString::new(value))
    }
}

impl From<Vec<u8>> for SecretValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for SecretValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<serde_json::Value> for SecretValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

macro_rules! structured_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SecretValue {
                fn from(value: $ty) -> Self {
                    Self::Structured(serde_json::Value::from(value))
                }
            }
        )*
    };
}

structured_from!(i32, i64, u32, u64, f64, bool);
