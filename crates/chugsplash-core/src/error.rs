//! # Error Types
//!
//! Errors owned by the core crate. Validation and canonicalization errors
//! live next to the components that raise them (`chugsplash-schema`,
//! `chugsplash-canonical`); this module only covers canonical byte
//! production.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalBytesError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations; use an integer or a decimal string: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
