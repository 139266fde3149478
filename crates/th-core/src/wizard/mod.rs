//! Wizard domain module.
//!
//! This module defines the signup wizard steps, guards and state machine.

mod error;
pub mod state_machine;
mod step;
pub mod validation;

pub use error::WizardError;
pub use state_machine::{
    SubmissionKind, Transition, TransitionOutcome, WizardAction, WizardEvent, WizardProgress,
    WizardStateMachine,
};
pub use step::{WizardPath, WizardStep};
pub use validation::ValidationFailure;
