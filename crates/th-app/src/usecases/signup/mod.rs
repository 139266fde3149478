//! Signup wizard use cases.
//!
//! This module exposes the signup wizard orchestrator and its read models.

mod context;
pub mod orchestrator;
pub mod view;

pub use context::PersistenceGuards;
pub use orchestrator::{SignupWizard, SignupWizardError};
pub use view::{AttachmentView, PersistenceWarning, WizardReport, WizardView};
