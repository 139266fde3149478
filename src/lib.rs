//! tutorhub signup wizard driver.
//!
//! Wires the wizard crates to a file store and a simulated backend, and
//! exposes the command line entry points used by `main.rs`.

pub mod bootstrap;
pub mod cli;
