use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::wizard::WizardPath;

/// Kind of account being registered.
///
/// This is the wizard's discriminant: `Tutor` unlocks the extended
/// teacher-application step.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Student,
    Tutor,
}

impl AccountKind {
    /// Step sequence selected by this account kind.
    pub fn path(self) -> WizardPath {
        match self {
            AccountKind::Student => WizardPath::Simple,
            AccountKind::Tutor => WizardPath::Extended,
        }
    }
}

/// Level a tutor wants to teach at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TeachingLevel {
    Primary,
    Secondary,
    University,
    Adult,
}

/// Fixed option set for the tutor's teaching interests.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Interest {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    ComputerScience,
    English,
    Spanish,
    French,
    German,
    History,
    Geography,
    Economics,
    Music,
    Art,
}
