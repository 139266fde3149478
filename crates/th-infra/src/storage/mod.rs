//! Key-value store adapters for the wizard snapshot.

mod file;
mod memory;

pub use file::{FileKeyValueStore, DEFAULT_STORE_DIR};
pub use memory::InMemoryKeyValueStore;
