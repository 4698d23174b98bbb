//! Ledger configuration
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then explicit overrides from the command line. [`LedgerConfig::validate`]
//! runs after the last layer is applied.

use crate::types::AuctionId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log levels accepted in configuration
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Default directory for the filesystem backend
pub const DEFAULT_DATA_DIR: &str = "./auction-data";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("Failed to parse config file {path}: {message}")]
    Parse {
        /// File that was being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A field holds a value outside its allowed range
    #[error("Invalid configuration: {field} - {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// Why the value is rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration validation trait
pub trait ConfigValidation {
    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; contents vanish on exit
    Memory,
    /// One file per key under `path`
    Filesystem,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend to use
    pub backend: StorageBackend,
    /// Base directory for the filesystem backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            path: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Auction (and storage key) transactions address
    pub auction_id: AuctionId,
    /// Tracing filter level
    pub log_level: String,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            auction_id: AuctionId::default(),
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse configuration from TOML text; absent fields keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Override the auction id
    pub fn with_auction_id(mut self, auction_id: AuctionId) -> Self {
        self.auction_id = auction_id;
        self
    }

    /// Override the data directory; implies the filesystem backend
    pub fn with_data_dir(mut self, path: PathBuf) -> Self {
        self.storage.backend = StorageBackend::Filesystem;
        self.storage.path = path;
        self
    }
}

impl ConfigValidation for LedgerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.auction_id.as_str().is_empty() {
            return Err(ConfigError::invalid("auction_id", "cannot be empty"));
        }
        let level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "log_level",
                format!("must be one of: {}", LOG_LEVELS.join(", ")),
            ));
        }
        if self.storage.backend == StorageBackend::Filesystem
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::invalid(
                "storage.path",
                "required for the filesystem backend",
            ));
        }
        Ok(())
    }
}
