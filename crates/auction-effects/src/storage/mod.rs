//! Storage effect handlers
//!
//! Implementations of [`LedgerEffects`] from `auction-core`, plus
//! [`StorageHandler`], which picks one according to [`StorageConfig`].

mod filesystem;
mod memory;

pub use filesystem::FilesystemLedgerHandler;
pub use memory::MemoryLedgerHandler;

use async_trait::async_trait;
use auction_core::{LedgerEffects, StorageBackend, StorageConfig, StorageError, Version, Versioned};
use tracing::info;

/// Configured storage backend
#[derive(Debug, Clone)]
pub enum StorageHandler {
    /// Process-local storage
    Memory(MemoryLedgerHandler),
    /// Directory-backed storage
    Filesystem(FilesystemLedgerHandler),
}

impl StorageHandler {
    /// Build the handler selected by `config`
    pub fn from_config(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory ledger storage");
                Self::Memory(MemoryLedgerHandler::new())
            }
            StorageBackend::Filesystem => {
                info!(path = %config.path.display(), "Using filesystem ledger storage");
                Self::Filesystem(FilesystemLedgerHandler::new(config.path.clone()))
            }
        }
    }

    /// Short backend name for diagnostics
    pub fn backend_type(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Filesystem(_) => "filesystem",
        }
    }
}

#[async_trait]
impl LedgerEffects for StorageHandler {
    async fn retrieve(&self, key: &str) -> Result<Option<Versioned>, StorageError> {
        match self {
            Self::Memory(handler) => handler.retrieve(key).await,
            Self::Filesystem(handler) => handler.retrieve(key).await,
        }
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<Version, StorageError> {
        match self {
            Self::Memory(handler) => handler.store(key, value).await,
            Self::Filesystem(handler) => handler.store(key, value).await,
        }
    }

    async fn store_if(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Version,
    ) -> Result<Version, StorageError> {
        match self {
            Self::Memory(handler) => handler.store_if(key, value, expected).await,
            Self::Filesystem(handler) => handler.store_if(key, value, expected).await,
        }
    }
}
