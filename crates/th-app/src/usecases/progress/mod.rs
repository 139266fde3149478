//! Wizard progress persistence use cases.
//!
//! Each use case works on the single snapshot key of a wizard session.

mod clear_progress;
mod load_progress;
mod save_progress;

pub use clear_progress::ClearProgress;
pub use load_progress::LoadProgress;
pub use save_progress::SaveProgress;

use th_core::ports::StorageError;

/// Errors produced while reading or writing the progress snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read stored progress: {0}")]
    Read(#[source] StorageError),
    #[error("stored progress is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to encode progress: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write progress: {0}")]
    Write(#[source] StorageError),
    #[error("failed to remove stored progress: {0}")]
    Clear(#[source] StorageError),
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use th_core::ports::{KeyValueStorePort, StorageError};

    /// Store whose writes can be switched to fail.
    #[derive(Default)]
    pub struct MockStore {
        pub entries: Mutex<HashMap<String, String>>,
        pub fail_writes: Mutex<Option<StorageError>>,
    }

    #[async_trait]
    impl KeyValueStorePort for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if let Some(err) = self.fail_writes.lock().unwrap().clone() {
                return Err(err);
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
