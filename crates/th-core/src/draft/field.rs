use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::attachment::Attachment;
use crate::wizard::WizardStep;

/// Name of a draft field.
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
pub enum DraftField {
    FirstName,
    LastName,
    Email,
    AccountKind,
    Password,
    PasswordConfirmation,
    TermsAccepted,
    MarketingOptIn,
    Headline,
    Bio,
    TeachingLevel,
    Interests,
    IntroVideo,
    ProfilePhoto,
}

/// Value kind a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    LongText,
    Boolean,
    Choice,
    Choices,
    Attachment,
}

impl DraftField {
    pub fn kind(self) -> FieldKind {
        match self {
            DraftField::FirstName
            | DraftField::LastName
            | DraftField::Email
            | DraftField::Password
            | DraftField::PasswordConfirmation
            | DraftField::Headline => FieldKind::ShortText,
            DraftField::Bio => FieldKind::LongText,
            DraftField::TermsAccepted | DraftField::MarketingOptIn => FieldKind::Boolean,
            DraftField::AccountKind | DraftField::TeachingLevel => FieldKind::Choice,
            DraftField::Interests => FieldKind::Choices,
            DraftField::IntroVideo | DraftField::ProfilePhoto => FieldKind::Attachment,
        }
    }

    /// Step on which the field is edited.
    pub fn step(self) -> WizardStep {
        match self {
            DraftField::FirstName
            | DraftField::LastName
            | DraftField::Email
            | DraftField::AccountKind => WizardStep::Account,
            DraftField::Password | DraftField::PasswordConfirmation => WizardStep::Credentials,
            DraftField::TermsAccepted | DraftField::MarketingOptIn => WizardStep::Agreement,
            DraftField::Headline
            | DraftField::Bio
            | DraftField::TeachingLevel
            | DraftField::Interests
            | DraftField::IntroVideo
            | DraftField::ProfilePhoto => WizardStep::TutorProfile,
        }
    }

    /// Attachment fields live only for the session and are never persisted.
    pub fn is_transient(self) -> bool {
        self.kind() == FieldKind::Attachment
    }

    /// Human readable label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            DraftField::FirstName => "First name",
            DraftField::LastName => "Last name",
            DraftField::Email => "Email",
            DraftField::AccountKind => "Account type",
            DraftField::Password => "Password",
            DraftField::PasswordConfirmation => "Password confirmation",
            DraftField::TermsAccepted => "Terms of service",
            DraftField::MarketingOptIn => "Newsletter",
            DraftField::Headline => "Headline",
            DraftField::Bio => "Bio",
            DraftField::TeachingLevel => "Teaching level",
            DraftField::Interests => "Interests",
            DraftField::IntroVideo => "Introduction video",
            DraftField::ProfilePhoto => "Profile photo",
        }
    }

    /// Parse a raw text value according to the field kind.
    ///
    /// Sets are comma separated. Attachments cannot be expressed as text.
    pub fn parse_value(self, raw: &str) -> Result<FieldValue, FieldError> {
        match self.kind() {
            FieldKind::ShortText | FieldKind::LongText => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(FieldValue::Flag(true)),
                "false" | "no" | "0" | "off" => Ok(FieldValue::Flag(false)),
                _ => Err(FieldError::InvalidFlag {
                    field: self,
                    value: raw.to_string(),
                }),
            },
            FieldKind::Choice => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(FieldValue::Choice(None))
                } else {
                    Ok(FieldValue::Choice(Some(trimmed.to_string())))
                }
            }
            FieldKind::Choices => Ok(FieldValue::Choices(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            FieldKind::Attachment => Err(FieldError::NotTextual { field: self }),
        }
    }
}

/// Typed value carried to and from a draft field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Choice(Option<String>),
    Choices(BTreeSet<String>),
    Attachment(Option<Attachment>),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Flag(_) => "boolean",
            FieldValue::Choice(_) => "choice",
            FieldValue::Choices(_) => "choices",
            FieldValue::Attachment(_) => "attachment",
        }
    }

    pub(crate) fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Text(_), FieldKind::ShortText | FieldKind::LongText)
                | (FieldValue::Flag(_), FieldKind::Boolean)
                | (FieldValue::Choice(_), FieldKind::Choice)
                | (FieldValue::Choices(_), FieldKind::Choices)
                | (FieldValue::Attachment(_), FieldKind::Attachment)
        )
    }
}

/// Errors raised when a value cannot be stored in a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} expects a {expected} value, got {found}")]
    KindMismatch {
        field: DraftField,
        expected: FieldKind,
        found: &'static str,
    },
    #[error("'{value}' is not a valid option for {field}")]
    InvalidChoice { field: DraftField, value: String },
    #[error("'{value}' is not a valid yes/no value for {field}")]
    InvalidFlag { field: DraftField, value: String },
    #[error("{field} cannot be set from text")]
    NotTextual { field: DraftField },
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Parse a field name, reporting unknown names as [`FieldError::UnknownField`].
pub fn parse_field(name: &str) -> Result<DraftField, FieldError> {
    DraftField::from_str(name.trim()).map_err(|_| FieldError::UnknownField(name.to_string()))
}
