//! In-memory ledger handler
//!
//! Backs tests and the `memory` backend. Clones share the same map, so one
//! handler can be handed to several ledgers that must observe each other.

use async_trait::async_trait;
use auction_core::effects::validate_key;
use auction_core::{LedgerEffects, StorageError, Version, Versioned};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory versioned key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerHandler {
    data: Arc<RwLock<HashMap<String, Versioned>>>,
}

impl MemoryLedgerHandler {
    /// Create an empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether nothing has been written yet
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl LedgerEffects for MemoryLedgerHandler {
    async fn retrieve(&self, key: &str) -> Result<Option<Versioned>, StorageError> {
        validate_key(key)?;
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<Version, StorageError> {
        validate_key(key)?;
        let mut data = self.data.write().await;
        let version = data
            .get(key)
            .map_or(Version::INITIAL, |current| current.version.next());
        data.insert(key.to_string(), Versioned { value, version });
        Ok(version)
    }

    async fn store_if(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Version,
    ) -> Result<Version, StorageError> {
        validate_key(key)?;
        let mut data = self.data.write().await;
        let actual = data.get(key).map(|current| current.version);
        if actual != Some(expected) {
            return Err(StorageError::Conflict {
                key: key.to_string(),
                expected,
                actual,
            });
        }
        let version = expected.next();
        data.insert(key.to_string(), Versioned { value, version });
        Ok(version)
    }
}
