//! Store and snapshot error types
//!
//! Defines the error taxonomy shared by the table, the snapshot codec
//! and the persistence layer.

use std::fmt;

/// Errors returned by store operations and snapshot handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert attempted on a key that is already present
    KeyExists,

    /// Read or update attempted on an absent key
    KeyNotFound,

    /// Snapshot serialization failed
    Encode(String),

    /// Snapshot deserialization failed (corrupt or truncated input)
    Decode(String),

    /// Durable read/write failed, distinct from encoding
    Persist(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::KeyExists => write!(f, "Key exists in store"),
            StoreError::KeyNotFound => write!(f, "Key does not exist in store"),
            StoreError::Encode(msg) => write!(f, "Snapshot encode failed: {}", msg),
            StoreError::Decode(msg) => write!(f, "Snapshot decode failed: {}", msg),
            StoreError::Persist(msg) => write!(f, "Snapshot I/O failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
