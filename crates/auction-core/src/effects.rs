//! Ledger storage effects
//!
//! The auction core never touches storage directly. It consumes
//! [`LedgerEffects`], a versioned key-value interface implemented by the
//! handlers in `auction-effects` or by the hosting ledger.
//!
//! Every write bumps the key's [`Version`]. Read-modify-write transactions
//! commit with [`LedgerEffects::store_if`], which refuses the write when
//! another writer got there first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Per-key write counter used for optimistic concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// Version of the first write to a key
    pub const INITIAL: Version = Version(1);

    /// Wrap a raw version number
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw version number
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Version that follows this one
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Stored bytes together with the version that wrote them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    /// Raw value bytes, exactly as written
    pub value: Vec<u8>,
    /// Version of the write that produced `value`
    pub version: Version,
}

/// Storage failures, propagated verbatim to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Reading from the backend failed
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Writing to the backend failed
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Key rejected by the backend
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// A conditional write observed a different version than expected
    #[error("version conflict on {key}: expected {expected}, found {}", display_version(.actual))]
    Conflict {
        /// Key that was being written
        key: String,
        /// Version the writer read
        expected: Version,
        /// Version currently stored, if any
        actual: Option<Version>,
    },
}

fn display_version(version: &Option<Version>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "nothing".to_string(),
    }
}

impl StorageError {
    /// Conflicts are transient: re-running the transaction reads the new value
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Versioned key-value storage consumed by the auction core
#[async_trait]
pub trait LedgerEffects: Send + Sync {
    /// Read a key. `None` means the key was never written, which is distinct
    /// from a key written with an empty value.
    async fn retrieve(&self, key: &str) -> Result<Option<Versioned>, StorageError>;

    /// Write a key unconditionally, returning the new version
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<Version, StorageError>;

    /// Write a key only if its current version equals `expected`
    async fn store_if(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Version,
    ) -> Result<Version, StorageError>;
}

#[async_trait]
impl<T: LedgerEffects + ?Sized> LedgerEffects for Arc<T> {
    async fn retrieve(&self, key: &str) -> Result<Option<Versioned>, StorageError> {
        (**self).retrieve(key).await
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<Version, StorageError> {
        (**self).store(key, value).await
    }

    async fn store_if(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Version,
    ) -> Result<Version, StorageError> {
        (**self).store_if(key, value, expected).await
    }
}

/// Validate a storage key. Shared by all handlers so they agree on what a
/// key may look like.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            reason: "Key cannot be empty".to_string(),
        });
    }
    if key.split(['/', '\\']).any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(StorageError::InvalidKey {
            reason: format!("Key '{key}' contains an empty or relative path component"),
        });
    }
    Ok(())
}
