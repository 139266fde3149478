//! Process bootstrap: configuration, tracing and dependency wiring.

pub mod config;
pub mod runtime;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_empty};
pub use runtime::RuntimeSettings;
pub use wiring::wire_signup_wizard;
