pub mod app_dirs;
pub mod gateway;
pub mod storage;

pub use app_dirs::DirsAppDirsAdapter;
pub use gateway::SimulatedSignupGateway;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
