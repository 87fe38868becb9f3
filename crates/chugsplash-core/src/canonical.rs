//! # Canonical Serialization: JCS Byte Production
//!
//! `CanonicalBytes` is the only construction path for bytes that are hashed
//! or published. A canonical config is only useful if two independent parties
//! derive the same bytes from it, so the serialization is pinned to RFC 8785
//! (JSON Canonicalization Scheme): sorted keys, compact separators, UTF-8.
//!
//! ## Coercion Rules
//!
//! 1. `null`, `bool`, `string` and integers pass through unchanged.
//! 2. Non-integer numbers are rejected with `FloatRejected`. Config
//!    variables are integers by construction; compiler inputs must be too.
//! 3. Object keys are already strings; values recurse.
//! 4. Arrays recurse element-wise.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalBytesError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No float numbers appear in the output.
/// - Keys are sorted and separators are compact.
///
/// The inner `Vec<u8>` is private, so downstream code cannot build one
/// through any other path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalBytesError::FloatRejected` if the value contains a
    /// non-integer number. Returns `CanonicalBytesError::SerializationFailed`
    /// if serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalBytesError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the wrapper and return the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn coerce_json_value(value: Value) -> Result<Value, CanonicalBytesError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalBytesError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalBytesError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}
