//! Step guards and submission rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::draft::{Draft, DraftField};
use crate::wizard::WizardStep;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_INTERESTS: usize = 5;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Unmet condition reported when a guard rejects the draft.
///
/// 校验失败原因。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("{} is required", .field.label())]
    MissingField { field: DraftField },
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {min_len} characters")]
    PasswordTooShort { min_len: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("terms not accepted")]
    TermsNotAccepted,
    #[error("select at least {required} interests ({selected} selected)")]
    TooFewInterests { required: usize, selected: usize },
    #[error("the account must be created before continuing")]
    AccountNotCreated,
    #[error("account type cannot change after the account is created")]
    AccountKindLocked,
}

/// Forward guard of `step`.
///
/// Agreement and TutorProfile carry no navigation guard of their own: their
/// conditions are enforced by the submit operations.
pub fn validate_step(draft: &Draft, step: WizardStep) -> Result<(), ValidationFailure> {
    match step {
        WizardStep::Account => {
            require(draft, step.required_fields())?;
            if !EMAIL_PATTERN.is_match(draft.email.trim()) {
                return Err(ValidationFailure::InvalidEmail);
            }
            Ok(())
        }
        WizardStep::Credentials => {
            require(draft, step.required_fields())?;
            if draft.password.chars().count() < MIN_PASSWORD_LEN {
                return Err(ValidationFailure::PasswordTooShort {
                    min_len: MIN_PASSWORD_LEN,
                });
            }
            if draft.password != draft.password_confirmation {
                return Err(ValidationFailure::PasswordMismatch);
            }
            Ok(())
        }
        WizardStep::Agreement | WizardStep::TutorProfile => Ok(()),
    }
}

/// Rules checked by the basic account submission.
///
/// Earlier steps may have been edited after they were passed, so their guards
/// run again before anything is sent.
pub fn validate_basic_submission(draft: &Draft) -> Result<(), ValidationFailure> {
    validate_step(draft, WizardStep::Account)?;
    validate_step(draft, WizardStep::Credentials)?;
    if !draft.terms_accepted {
        return Err(ValidationFailure::TermsNotAccepted);
    }
    Ok(())
}

/// Rules checked by the extended profile submission, first failure wins.
pub fn validate_extended_profile(draft: &Draft) -> Result<(), ValidationFailure> {
    require(
        draft,
        &[DraftField::Headline, DraftField::Bio, DraftField::TeachingLevel],
    )?;
    if draft.interests.len() < MIN_INTERESTS {
        return Err(ValidationFailure::TooFewInterests {
            required: MIN_INTERESTS,
            selected: draft.interests.len(),
        });
    }
    require(draft, &[DraftField::IntroVideo])
}

fn require(draft: &Draft, fields: &[DraftField]) -> Result<(), ValidationFailure> {
    match fields.iter().find(|field| !draft.is_filled(**field)) {
        Some(field) => Err(ValidationFailure::MissingField { field: *field }),
        None => Ok(()),
    }
}
