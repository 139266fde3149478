//! Port interfaces for the application layer
//!
//! Ports define the contract between the wizard use cases and infrastructure
//! implementations, so the wizard can run against a browser-like key-value
//! store, a file store, or an in-memory fake.

pub mod errors;
pub mod key_value_store;
pub mod signup_gateway;

pub use errors::{StorageError, SubmissionError};
pub use key_value_store::KeyValueStorePort;
pub use signup_gateway::{AccountReceipt, BasicAccountRequest, ExtendedProfileRequest, SignupGatewayPort};
