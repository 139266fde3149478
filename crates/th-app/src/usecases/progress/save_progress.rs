use std::sync::Arc;

use th_core::ports::KeyValueStorePort;
use th_core::PersistedProgress;

use super::PersistenceError;

/// Use case for writing the full wizard snapshot.
///
/// The snapshot is encoded before anything is written, so the store either
/// receives the whole record or nothing.
pub struct SaveProgress {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
}

impl SaveProgress {
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn execute(&self, snapshot: &PersistedProgress) -> Result<(), PersistenceError> {
        let raw = snapshot.to_json().map_err(PersistenceError::Encode)?;
        self.store
            .set(&self.key, &raw)
            .await
            .map_err(PersistenceError::Write)
    }
}
