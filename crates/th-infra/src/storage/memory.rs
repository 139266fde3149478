//! In-memory key-value store
//!
//! Stands in for browser local storage in tests and single-process runs. An
//! optional byte quota reproduces the "quota exceeded" failure of real
//! browser storage.

use std::collections::HashMap;

use async_trait::async_trait;
use th_core::ports::{KeyValueStorePort, StorageError};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes once keys and values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Seed a raw value, bypassing the quota.
    pub async fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().await.insert(key.into(), value.into());
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

fn used_bytes(entries: &HashMap<String, String>, excluding: &str) -> usize {
    entries
        .iter()
        .filter(|(key, _)| key.as_str() != excluding)
        .map(|(key, value)| key.len() + value.len())
        .sum()
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        if let Some(quota) = self.quota_bytes {
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(used_bytes(&entries, key));
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_none_for_missing_key() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trip() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn quota_rejects_oversized_value_and_keeps_previous() {
        let store = InMemoryKeyValueStore::with_quota(10);
        store.set("k", "small").await.unwrap();

        let err = store.set("k", "far too large").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("small"));
    }

    #[tokio::test]
    async fn quota_counts_replaced_value_once() {
        let store = InMemoryKeyValueStore::with_quota(8);
        store.set("k", "1234567").await.unwrap();
        store.set("k", "7654321").await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
