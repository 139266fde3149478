use serde::{Deserialize, Serialize};
use strum::Display;

use crate::draft::DraftField;

/// One stage of the signup wizard, in order.
///
/// 向导步骤，按顺序排列。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WizardStep {
    /// Name, e-mail and account kind.
    #[default]
    Account,
    /// Password and confirmation.
    Credentials,
    /// Terms and newsletter. The basic account is submitted here.
    Agreement,
    /// Teacher application, only on the extended path.
    TutorProfile,
}

impl WizardStep {
    /// Step where the simple and extended paths diverge.
    pub const BRANCH: WizardStep = WizardStep::Agreement;

    const ORDER: [WizardStep; 4] = [
        WizardStep::Account,
        WizardStep::Credentials,
        WizardStep::Agreement,
        WizardStep::TutorProfile,
    ];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Account => 0,
            WizardStep::Credentials => 1,
            WizardStep::Agreement => 2,
            WizardStep::TutorProfile => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    /// Clamp a raw stored index into the valid range of `path`.
    pub fn clamped(raw: i64, path: WizardPath) -> Self {
        let last = path.last_step().index() as i64;
        let index = raw.clamp(0, last) as usize;
        Self::from_index(index).unwrap_or(WizardStep::Account)
    }

    pub fn next(self, path: WizardPath) -> Option<Self> {
        Self::from_index(self.index() + 1).filter(|next| path.contains(*next))
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Fields that must be filled before leaving this step forward.
    pub fn required_fields(self) -> &'static [DraftField] {
        match self {
            WizardStep::Account => &[DraftField::FirstName, DraftField::LastName, DraftField::Email],
            WizardStep::Credentials => &[DraftField::Password, DraftField::PasswordConfirmation],
            WizardStep::Agreement => &[DraftField::TermsAccepted],
            WizardStep::TutorProfile => &[
                DraftField::Headline,
                DraftField::Bio,
                DraftField::TeachingLevel,
                DraftField::Interests,
                DraftField::IntroVideo,
            ],
        }
    }
}

/// Step sequence selected by the draft's account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WizardPath {
    /// Account, Credentials, Agreement.
    Simple,
    /// Simple path plus the tutor profile step.
    Extended,
}

impl WizardPath {
    pub fn last_step(self) -> WizardStep {
        match self {
            WizardPath::Simple => WizardStep::Agreement,
            WizardPath::Extended => WizardStep::TutorProfile,
        }
    }

    pub fn contains(self, step: WizardStep) -> bool {
        step <= self.last_step()
    }

    pub fn steps(self) -> impl Iterator<Item = WizardStep> {
        WizardStep::ORDER
            .into_iter()
            .filter(move |step| self.contains(*step))
    }
}
