//! Filesystem ledger handler
//!
//! Each key is stored as `<base>/<key>.dat`. The file holds an 8-byte
//! big-endian version followed by the raw value, and is replaced through a
//! temporary file and a rename so readers never observe a torn write.
//!
//! Writes are serialized within one process. Two processes sharing a base
//! directory get untorn reads but no compare-and-swap guarantee between them.

use async_trait::async_trait;
use auction_core::effects::validate_key;
use auction_core::{LedgerEffects, StorageError, Version, Versioned};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const VERSION_LEN: usize = 8;

/// Filesystem-backed versioned key-value store
#[derive(Debug, Clone)]
pub struct FilesystemLedgerHandler {
    /// Base directory for storage files
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FilesystemLedgerHandler {
    /// Create a handler rooted at `base_path`; the directory is created lazily
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.dat"))
    }

    async fn read_entry(&self, key: &str) -> Result<Option<Versioned>, StorageError> {
        let path = self.file_path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        if bytes.len() < VERSION_LEN {
            return Err(StorageError::ReadFailed(format!(
                "Truncated entry {}: {} bytes",
                path.display(),
                bytes.len()
            )));
        }
        let (header, value) = bytes.split_at(VERSION_LEN);
        let mut raw = [0u8; VERSION_LEN];
        raw.copy_from_slice(header);

        Ok(Some(Versioned {
            value: value.to_vec(),
            version: Version::new(u64::from_be_bytes(raw)),
        }))
    }

    async fn write_entry(
        &self,
        key: &str,
        value: &[u8],
        version: Version,
    ) -> Result<(), StorageError> {
        let path = self.file_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteFailed(format!("Failed to create directory: {e}"))
            })?;
        }

        let mut contents = Vec::with_capacity(VERSION_LEN + value.len());
        contents.extend_from_slice(&version.value().to_be_bytes());
        contents.extend_from_slice(value);

        let tmp = path.with_extension("dat.tmp");
        fs::write(&tmp, contents)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to replace file: {e}")))?;

        debug!(key, %version, path = %path.display(), "Entry written");
        Ok(())
    }
}

#[async_trait]
impl LedgerEffects for FilesystemLedgerHandler {
    async fn retrieve(&self, key: &str) -> Result<Option<Versioned>, StorageError> {
        validate_key(key)?;
        self.read_entry(key).await
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<Version, StorageError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;
        // An unreadable entry must not block an overwrite; numbering restarts.
        let version = match self.read_entry(key).await {
            Ok(current) => current.map_or(Version::INITIAL, |current| current.version.next()),
            Err(e) => {
                warn!(key, error = %e, "Replacing unreadable entry");
                Version::INITIAL
            }
        };
        self.write_entry(key, &value, version).await?;
        Ok(version)
    }

    async fn store_if(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: Version,
    ) -> Result<Version, StorageError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().await;
        let actual = self.read_entry(key).await?.map(|current| current.version);
        if actual != Some(expected) {
            return Err(StorageError::Conflict {
                key: key.to_string(),
                expected,
                actual,
            });
        }
        let version = expected.next();
        self.write_entry(key, &value, version).await?;
        Ok(version)
    }
}
