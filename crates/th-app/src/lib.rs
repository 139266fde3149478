//! tutorhub application layer
//!
//! This crate contains the signup wizard use cases: the orchestrator that runs
//! the core state machine against injected storage and submission ports.

pub mod usecases;

pub use usecases::{SignupWizard, SignupWizardError, WizardReport, WizardView};
