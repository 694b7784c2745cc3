//! Payload coercion - handler return values to wire bytes.
//!
//! Handlers return a [`Payload`], an explicit sum over the three shapes the
//! wire accepts plus the empty case:
//!
//! - [`Payload::Bytes`] - passed through unchanged
//! - [`Payload::Text`] - UTF-8 bytes of the string, verbatim (no JSON quoting)
//! - [`Payload::Structured`] - JSON-serialized
//! - [`Payload::Empty`] - empty success payload
//!
//! [`Payload::into_bytes`] is total for these inputs; the only failure path
//! is JSON serialization of a structured value, which the dispatcher catches
//! like any other handler error.
//!
//! # Example
//!
//! ```
//! use ledgershim::payload::Payload;
//!
//! let text: Payload = "hello".into();
//! assert_eq!(&text.into_bytes().unwrap()[..], b"hello");
//!
//! let structured: Payload = serde_json::json!({"a": 1}).into();
//! assert_eq!(&structured.into_bytes().unwrap()[..], br#"{"a":1}"#);
//! ```

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// A handler return value, prior to wire coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload; the transaction still succeeds.
    Empty,
    /// Raw bytes, passed through unchanged.
    Bytes(Bytes),
    /// Text, encoded as its UTF-8 bytes verbatim.
    Text(String),
    /// Structured value, JSON-serialized.
    Structured(Value),
}

impl Payload {
    /// Build a structured payload from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Structured(serde_json::to_value(value)?))
    }

    /// Coerce into the wire byte representation.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => Ok(Bytes::from(text)),
            Self::Structured(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
        }
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}
