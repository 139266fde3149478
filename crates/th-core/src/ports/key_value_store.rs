use async_trait::async_trait;

use crate::ports::errors::StorageError;

/// Durable client-side key-value store holding the wizard snapshot.
///
/// Every `set` replaces the whole value for `key`.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
