use crate::wizard::{SubmissionKind, ValidationFailure, WizardStep};

/// Errors produced by wizard transitions.
///
/// 向导状态迁移错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("{operation} is only available on the {expected} step (current step: {actual})")]
    WrongStep {
        operation: &'static str,
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("the wizard has already been completed")]
    Completed,
    #[error("the draft is locked while the {submission} submission is pending")]
    SubmissionPending { submission: SubmissionKind },
}

impl WizardError {
    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            WizardError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
