use std::sync::Arc;

use th_core::ports::KeyValueStorePort;
use th_core::PersistedProgress;

use super::PersistenceError;

/// Use case for reading the stored wizard snapshot.
pub struct LoadProgress {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
}

impl LoadProgress {
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns `None` when nothing is stored under the key.
    pub async fn execute(&self) -> Result<Option<PersistedProgress>, PersistenceError> {
        let Some(raw) = self
            .store
            .get(&self.key)
            .await
            .map_err(PersistenceError::Read)?
        else {
            return Ok(None);
        };

        PersistedProgress::from_json(&raw)
            .map(Some)
            .map_err(PersistenceError::Malformed)
    }
}
