use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::draft::choices::{AccountKind, Interest, TeachingLevel};
use crate::draft::field::{DraftField, FieldError, FieldValue};
use crate::wizard::WizardPath;

/// Accumulated, partially filled signup / teacher application record.
///
/// Missing fields deserialize to their defaults, so a stored draft is merged
/// shallowly over [`Draft::default`]. Attachments are skipped by serde and
/// therefore never reach durable storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub account_kind: AccountKind,

    pub password: String,
    pub password_confirmation: String,

    pub terms_accepted: bool,
    pub marketing_opt_in: bool,

    pub headline: String,
    pub bio: String,
    pub teaching_level: Option<TeachingLevel>,
    pub interests: BTreeSet<Interest>,

    #[serde(skip)]
    pub intro_video: Option<Attachment>,
    #[serde(skip)]
    pub profile_photo: Option<Attachment>,
}

impl Draft {
    pub fn path(&self) -> WizardPath {
        self.account_kind.path()
    }

    /// Store `value` in `field`, checking the value kind and choice options.
    pub fn apply(&mut self, field: DraftField, value: FieldValue) -> Result<(), FieldError> {
        if !value.fits(field.kind()) {
            return Err(FieldError::KindMismatch {
                field,
                expected: field.kind(),
                found: value.kind_name(),
            });
        }

        match (field, value) {
            (DraftField::FirstName, FieldValue::Text(text)) => self.first_name = text,
            (DraftField::LastName, FieldValue::Text(text)) => self.last_name = text,
            (DraftField::Email, FieldValue::Text(text)) => self.email = text,
            (DraftField::Password, FieldValue::Text(text)) => self.password = text,
            (DraftField::PasswordConfirmation, FieldValue::Text(text)) => {
                self.password_confirmation = text
            }
            (DraftField::Headline, FieldValue::Text(text)) => self.headline = text,
            (DraftField::Bio, FieldValue::Text(text)) => self.bio = text,
            (DraftField::TermsAccepted, FieldValue::Flag(flag)) => self.terms_accepted = flag,
            (DraftField::MarketingOptIn, FieldValue::Flag(flag)) => self.marketing_opt_in = flag,
            (DraftField::AccountKind, FieldValue::Choice(choice)) => {
                self.account_kind = parse_choice(field, choice.as_deref())?
                    .ok_or_else(|| FieldError::InvalidChoice {
                        field,
                        value: String::new(),
                    })?;
            }
            (DraftField::TeachingLevel, FieldValue::Choice(choice)) => {
                self.teaching_level = parse_choice(field, choice.as_deref())?;
            }
            (DraftField::Interests, FieldValue::Choices(choices)) => {
                self.interests = choices
                    .iter()
                    .map(|raw| {
                        Interest::from_str(raw).map_err(|_| FieldError::InvalidChoice {
                            field,
                            value: raw.clone(),
                        })
                    })
                    .collect::<Result<BTreeSet<_>, FieldError>>()?;
            }
            (DraftField::IntroVideo, FieldValue::Attachment(attachment)) => {
                self.intro_video = attachment
            }
            (DraftField::ProfilePhoto, FieldValue::Attachment(attachment)) => {
                self.profile_photo = attachment
            }
            (field, value) => {
                return Err(FieldError::KindMismatch {
                    field,
                    expected: field.kind(),
                    found: value.kind_name(),
                })
            }
        }
        Ok(())
    }

    /// Current value of `field`.
    pub fn get(&self, field: DraftField) -> FieldValue {
        match field {
            DraftField::FirstName => FieldValue::Text(self.first_name.clone()),
            DraftField::LastName => FieldValue::Text(self.last_name.clone()),
            DraftField::Email => FieldValue::Text(self.email.clone()),
            DraftField::Password => FieldValue::Text(self.password.clone()),
            DraftField::PasswordConfirmation => {
                FieldValue::Text(self.password_confirmation.clone())
            }
            DraftField::Headline => FieldValue::Text(self.headline.clone()),
            DraftField::Bio => FieldValue::Text(self.bio.clone()),
            DraftField::TermsAccepted => FieldValue::Flag(self.terms_accepted),
            DraftField::MarketingOptIn => FieldValue::Flag(self.marketing_opt_in),
            DraftField::AccountKind => {
                FieldValue::Choice(Some(self.account_kind.as_ref().to_string()))
            }
            DraftField::TeachingLevel => {
                FieldValue::Choice(self.teaching_level.map(|level| level.as_ref().to_string()))
            }
            DraftField::Interests => FieldValue::Choices(
                self.interests
                    .iter()
                    .map(|interest| interest.as_ref().to_string())
                    .collect(),
            ),
            DraftField::IntroVideo => FieldValue::Attachment(self.intro_video.clone()),
            DraftField::ProfilePhoto => FieldValue::Attachment(self.profile_photo.clone()),
        }
    }

    /// Whether `field` holds a non-empty, non-default value.
    pub fn is_filled(&self, field: DraftField) -> bool {
        match field {
            DraftField::FirstName => !self.first_name.trim().is_empty(),
            DraftField::LastName => !self.last_name.trim().is_empty(),
            DraftField::Email => !self.email.trim().is_empty(),
            DraftField::Password => !self.password.is_empty(),
            DraftField::PasswordConfirmation => !self.password_confirmation.is_empty(),
            DraftField::Headline => !self.headline.trim().is_empty(),
            DraftField::Bio => !self.bio.trim().is_empty(),
            DraftField::TermsAccepted => self.terms_accepted,
            DraftField::MarketingOptIn => self.marketing_opt_in,
            DraftField::AccountKind => true,
            DraftField::TeachingLevel => self.teaching_level.is_some(),
            DraftField::Interests => !self.interests.is_empty(),
            DraftField::IntroVideo => self.intro_video.is_some(),
            DraftField::ProfilePhoto => self.profile_photo.is_some(),
        }
    }

    pub fn attachment(&self, field: DraftField) -> Option<&Attachment> {
        match field {
            DraftField::IntroVideo => self.intro_video.as_ref(),
            DraftField::ProfilePhoto => self.profile_photo.as_ref(),
            _ => None,
        }
    }

    /// Carry over the in-memory attachments of `current`.
    ///
    /// Used on hydration: stored drafts never hold attachments, and the ones
    /// already selected in this session must survive.
    pub fn with_attachments_of(mut self, current: &Draft) -> Self {
        self.intro_video = current.intro_video.clone();
        self.profile_photo = current.profile_photo.clone();
        self
    }
}

fn parse_choice<T: FromStr>(field: DraftField, raw: Option<&str>) -> Result<Option<T>, FieldError> {
    match raw {
        None => Ok(None),
        Some(raw) => T::from_str(raw)
            .map(Some)
            .map_err(|_| FieldError::InvalidChoice {
                field,
                value: raw.to_string(),
            }),
    }
}
