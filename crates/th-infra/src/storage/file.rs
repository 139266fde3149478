//! File-based key-value store
//!
//! This module provides a file-based implementation of the KeyValueStorePort,
//! keeping one JSON document per key in a directory. Writes go to a temporary
//! file which is then renamed over the target, so a reader sees either the
//! previous snapshot or the new one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use th_core::ports::{KeyValueStorePort, StorageError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_STORE_DIR: &str = "store";

pub struct FileKeyValueStore {
    base_dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileKeyValueStore {
    /// Create store rooted at `base_dir`
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            quota_bytes: None,
        }
    }

    /// Create store with defaults under the application data directory
    pub fn with_defaults(data_dir: PathBuf) -> Self {
        Self::new(data_dir.join(DEFAULT_STORE_DIR))
    }

    /// Refuse single entries larger than `quota_bytes` (key plus value).
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{file_name}.json"))
    }

    async fn ensure_base_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            let needed = key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    needed,
                    available: quota,
                });
            }
        }
        self.ensure_base_dir().await?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension(format!("json.tmp-{}", Uuid::new_v4()));

        let write = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, &path).await
        };

        if let Err(err) = write.await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io(format!(
                "failed to write {}: {err}",
                path.display()
            )));
        }

        debug!(path = %path.display(), bytes = value.len(), "key-value entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(format!(
                "failed to remove {}: {err}",
                path.display()
            ))),
        }
    }
}
