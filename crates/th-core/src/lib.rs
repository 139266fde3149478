//! # th-core
//!
//! Core domain models for the tutorhub signup wizard.
//!
//! This crate contains the pure wizard state machine, the draft record and its
//! validation rules, the persisted snapshot format, and the port traits that
//! infrastructure implements. It performs no I/O.

pub mod attachment;
pub mod config;
pub mod draft;
pub mod ports;
pub mod progress;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use attachment::{Attachment, AttachmentId, PreviewHandle, PreviewRegistry};
pub use config::AppConfig;
pub use draft::{AccountKind, Draft, DraftField, FieldError, FieldKind, FieldValue, Interest, TeachingLevel};
pub use progress::{PersistedProgress, SubmittedFlags};
pub use wizard::{
    SubmissionKind, Transition, TransitionOutcome, ValidationFailure, WizardAction, WizardError,
    WizardEvent, WizardPath, WizardProgress, WizardStateMachine, WizardStep,
};
