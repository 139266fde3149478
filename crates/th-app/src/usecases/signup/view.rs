//! Read models returned by the signup wizard.

use serde::Serialize;
use th_core::{
    Draft, DraftField, SubmissionKind, SubmittedFlags, TransitionOutcome, WizardPath, WizardStep,
};

use super::context::{PersistenceGuards, WizardState};

const MASK: &str = "********";

/// Non-fatal persistence problem. In-memory state stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersistenceWarning {
    ReadFailed { message: String },
    WriteFailed { message: String },
    ClearFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentView {
    pub field: DraftField,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub preview_url: Option<String>,
}

/// Snapshot of a wizard session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub step_index: usize,
    pub last_step_index: usize,
    pub path: WizardPath,
    pub submitted: SubmittedFlags,
    pub in_flight: Option<SubmissionKind>,
    pub completed: bool,
    pub account_id: Option<String>,
    pub guards: PersistenceGuards,
    pub draft: Draft,
    pub attachments: Vec<AttachmentView>,
}

impl WizardView {
    pub(crate) fn of(state: &WizardState) -> Self {
        let path = state.draft.path();
        let attachments = [DraftField::IntroVideo, DraftField::ProfilePhoto]
            .into_iter()
            .filter_map(|field| {
                let attachment = state.draft.attachment(field)?;
                Some(AttachmentView {
                    field,
                    file_name: attachment.file_name().to_string(),
                    content_type: attachment.content_type().to_string(),
                    size: attachment.len(),
                    preview_url: state.previews.get(&field).map(|handle| handle.url()),
                })
            })
            .collect();

        Self {
            step: state.progress.step,
            step_index: state.progress.step.index(),
            last_step_index: path.last_step().index(),
            path,
            submitted: state.progress.submitted,
            in_flight: state.progress.in_flight,
            completed: state.progress.is_completed(path),
            account_id: state.account_id.clone(),
            guards: state.guards,
            draft: state.draft.clone(),
            attachments,
        }
    }

    /// Copy with password fields masked, for printing.
    pub fn redacted(mut self) -> Self {
        for secret in [
            &mut self.draft.password,
            &mut self.draft.password_confirmation,
        ] {
            if !secret.is_empty() {
                *secret = MASK.to_string();
            }
        }
        self
    }
}

/// Result of one wizard operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardReport {
    pub outcome: TransitionOutcome,
    pub view: WizardView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PersistenceWarning>,
}
