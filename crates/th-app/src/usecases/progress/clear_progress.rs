use std::sync::Arc;

use th_core::ports::KeyValueStorePort;

use super::PersistenceError;

/// Use case for removing the stored wizard snapshot.
pub struct ClearProgress {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
}

impl ClearProgress {
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn execute(&self) -> Result<(), PersistenceError> {
        self.store
            .remove(&self.key)
            .await
            .map_err(PersistenceError::Clear)
    }
}
