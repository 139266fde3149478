use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::attachment::Attachment;
use crate::draft::{AccountKind, Draft, DraftField, Interest, TeachingLevel};
use crate::ports::errors::SubmissionError;
use crate::wizard::ValidationFailure;

/// Payload of the "create basic account" call.
#[derive(Clone, PartialEq)]
pub struct BasicAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub account_kind: AccountKind,
    pub marketing_opt_in: bool,
}

impl BasicAccountRequest {
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            password: draft.password.clone(),
            account_kind: draft.account_kind,
            marketing_opt_in: draft.marketing_opt_in,
        }
    }
}

impl fmt::Debug for BasicAccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAccountRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("account_kind", &self.account_kind)
            .field("marketing_opt_in", &self.marketing_opt_in)
            .finish()
    }
}

/// Payload of the "submit extended profile" call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedProfileRequest {
    pub email: String,
    pub headline: String,
    pub bio: String,
    pub teaching_level: TeachingLevel,
    pub interests: BTreeSet<Interest>,
    pub intro_video: Attachment,
    pub profile_photo: Option<Attachment>,
}

impl ExtendedProfileRequest {
    pub fn from_draft(draft: &Draft) -> Result<Self, ValidationFailure> {
        let teaching_level = draft.teaching_level.ok_or(ValidationFailure::MissingField {
            field: DraftField::TeachingLevel,
        })?;
        let intro_video = draft
            .intro_video
            .clone()
            .ok_or(ValidationFailure::MissingField {
                field: DraftField::IntroVideo,
            })?;
        Ok(Self {
            email: draft.email.trim().to_string(),
            headline: draft.headline.trim().to_string(),
            bio: draft.bio.clone(),
            teaching_level,
            interests: draft.interests.clone(),
            intro_video,
            profile_photo: draft.profile_photo.clone(),
        })
    }
}

/// Receipt returned when the basic account has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReceipt {
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

/// External collaborator that owns accounts and tutor profiles.
#[async_trait]
pub trait SignupGatewayPort: Send + Sync {
    async fn create_account(
        &self,
        request: &BasicAccountRequest,
    ) -> Result<AccountReceipt, SubmissionError>;

    async fn submit_profile(&self, request: &ExtendedProfileRequest) -> Result<(), SubmissionError>;
}
