//! Persisted wizard progress.
//!
//! The snapshot written to durable storage after every change:
//!
//! ```json
//! { "step": 2, "submittedFlags": { "basic": false, "extended": false }, "draft": { ... } }
//! ```
//!
//! Attachments are not part of the snapshot.

use serde::{Deserialize, Serialize};

use crate::draft::Draft;
use crate::wizard::{WizardProgress, WizardStep};

/// One flag per irreversible submission milestone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmittedFlags {
    pub basic: bool,
    pub extended: bool,
}

/// Durable snapshot of a wizard session.
///
/// 向导进度的持久化快照。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedProgress {
    /// Raw step index; clamped on restore rather than rejected.
    pub step: i64,
    pub submitted_flags: SubmittedFlags,
    pub draft: Draft,
}

impl PersistedProgress {
    pub fn capture(progress: &WizardProgress, draft: &Draft) -> Self {
        let mut draft = draft.clone();
        draft.intro_video = None;
        draft.profile_photo = None;
        Self {
            step: progress.step.index() as i64,
            submitted_flags: progress.submitted,
            draft,
        }
    }

    /// Rebuild session state from the snapshot.
    ///
    /// The step is clamped into the range of the restored account kind's path
    /// and the attachments of `current` are kept.
    pub fn restore(self, current: &Draft) -> (WizardProgress, Draft) {
        let draft = self.draft.with_attachments_of(current);
        let progress = WizardProgress {
            step: WizardStep::clamped(self.step, draft.path()),
            submitted: self.submitted_flags,
            in_flight: None,
        };
        (progress, draft)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
