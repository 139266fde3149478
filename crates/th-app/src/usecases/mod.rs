//! Business logic use cases

pub mod progress;
pub mod signup;

pub use progress::{ClearProgress, LoadProgress, PersistenceError, SaveProgress};
pub use signup::{
    AttachmentView, PersistenceGuards, PersistenceWarning, SignupWizard, SignupWizardError,
    WizardReport, WizardView,
};
