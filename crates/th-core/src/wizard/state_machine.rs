//! Signup wizard state machine.
//!
//! Defines a pure state transition function for the signup flow. Side effects
//! (network submissions, clearing stored progress) are returned as actions and
//! executed by the caller.

use serde::Serialize;
use strum::Display;

use crate::draft::Draft;
use crate::progress::SubmittedFlags;
use crate::wizard::validation::{
    validate_basic_submission, validate_extended_profile, validate_step,
};
use crate::wizard::{ValidationFailure, WizardError, WizardPath, WizardStep};

/// The two irreversible submissions of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionKind {
    /// Create the basic account.
    Basic,
    /// Submit the tutor profile.
    Extended,
}

/// Session progress through the wizard.
///
/// Only `step` and `submitted` are persisted. `in_flight` marks a dispatched
/// submission awaiting its response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WizardProgress {
    pub step: WizardStep,
    pub submitted: SubmittedFlags,
    pub in_flight: Option<SubmissionKind>,
}

impl WizardProgress {
    pub fn initial() -> Self {
        Self::default()
    }

    /// Whether every submission the path needs has succeeded.
    pub fn is_completed(&self, path: WizardPath) -> bool {
        match path {
            WizardPath::Simple => self.submitted.basic,
            WizardPath::Extended => self.submitted.extended,
        }
    }

    /// Keep the active step inside `path`.
    pub fn clamp_to(&mut self, path: WizardPath) {
        if !path.contains(self.step) {
            self.step = path.last_step();
        }
    }
}

/// Events that drive the wizard.
///
/// 驱动向导的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// Move forward, subject to the current step's guard.
    Advance,
    /// Move one step back. Never validates.
    Retreat,
    /// Create the basic account from the branch step.
    SubmitBasic,
    /// Submit the tutor profile from the last extended step.
    SubmitExtended,
    /// The collaborator accepted a dispatched submission.
    SubmissionSucceeded(SubmissionKind),
    /// The collaborator rejected a dispatched submission, or it never arrived.
    SubmissionFailed(SubmissionKind),
}

/// Side effects produced by transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    /// Call the "create basic account" collaborator.
    CreateAccount,
    /// Call the "submit extended profile" collaborator.
    SubmitProfile,
    /// Remove the persisted snapshot; the wizard is finished.
    ClearProgress,
}

/// What a transition did, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Moved { from: WizardStep, to: WizardStep },
    AtFirstStep,
    AtFinalStep,
    Dispatched { submission: SubmissionKind },
    AlreadySubmitted { submission: SubmissionKind },
    InFlight { submission: SubmissionKind },
    Completed,
    Unchanged,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub progress: WizardProgress,
    pub actions: Vec<WizardAction>,
    pub outcome: TransitionOutcome,
}

impl Transition {
    fn stay(progress: &WizardProgress, outcome: TransitionOutcome) -> Self {
        Self {
            progress: progress.clone(),
            actions: Vec::new(),
            outcome,
        }
    }

    fn moved(progress: &WizardProgress, to: WizardStep) -> Self {
        let mut next = progress.clone();
        next.step = to;
        Self {
            progress: next,
            actions: Vec::new(),
            outcome: TransitionOutcome::Moved {
                from: progress.step,
                to,
            },
        }
    }
}

/// Pure wizard state machine.
///
/// 纯状态机：不包含副作用。
pub struct WizardStateMachine;

impl WizardStateMachine {
    pub fn transition(
        progress: &WizardProgress,
        draft: &Draft,
        event: WizardEvent,
    ) -> Result<Transition, WizardError> {
        let path = draft.path();
        match event {
            WizardEvent::Advance => Self::advance(progress, draft, path),
            WizardEvent::Retreat => Self::retreat(progress, path),
            WizardEvent::SubmitBasic => Self::submit_basic(progress, draft),
            WizardEvent::SubmitExtended => Self::submit_extended(progress, draft, path),
            WizardEvent::SubmissionSucceeded(kind) => {
                Ok(Self::submission_succeeded(progress, path, kind))
            }
            WizardEvent::SubmissionFailed(kind) => {
                let mut next = progress.clone();
                if next.in_flight == Some(kind) {
                    next.in_flight = None;
                }
                Ok(Transition {
                    progress: next,
                    actions: Vec::new(),
                    outcome: TransitionOutcome::Unchanged,
                })
            }
        }
    }

    fn advance(
        progress: &WizardProgress,
        draft: &Draft,
        path: WizardPath,
    ) -> Result<Transition, WizardError> {
        if progress.is_completed(path) {
            return Err(WizardError::Completed);
        }
        if let Some(submission) = progress.in_flight {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::InFlight { submission },
            ));
        }
        let Some(next) = progress.step.next(path) else {
            return Ok(Transition::stay(progress, TransitionOutcome::AtFinalStep));
        };

        validate_step(draft, progress.step)?;
        if progress.step == WizardStep::BRANCH && !progress.submitted.basic {
            return Err(ValidationFailure::AccountNotCreated.into());
        }
        Ok(Transition::moved(progress, next))
    }

    fn retreat(progress: &WizardProgress, path: WizardPath) -> Result<Transition, WizardError> {
        if progress.is_completed(path) {
            return Err(WizardError::Completed);
        }
        if let Some(submission) = progress.in_flight {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::InFlight { submission },
            ));
        }
        match progress.step.previous() {
            Some(previous) => Ok(Transition::moved(progress, previous)),
            None => Ok(Transition::stay(progress, TransitionOutcome::AtFirstStep)),
        }
    }

    fn submit_basic(progress: &WizardProgress, draft: &Draft) -> Result<Transition, WizardError> {
        if progress.submitted.basic {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::AlreadySubmitted {
                    submission: SubmissionKind::Basic,
                },
            ));
        }
        if let Some(submission) = progress.in_flight {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::InFlight { submission },
            ));
        }
        if progress.step != WizardStep::BRANCH {
            return Err(WizardError::WrongStep {
                operation: "submit_basic",
                expected: WizardStep::BRANCH,
                actual: progress.step,
            });
        }

        validate_basic_submission(draft)?;
        Ok(Self::dispatch(progress, SubmissionKind::Basic))
    }

    fn submit_extended(
        progress: &WizardProgress,
        draft: &Draft,
        path: WizardPath,
    ) -> Result<Transition, WizardError> {
        if progress.submitted.extended {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::AlreadySubmitted {
                    submission: SubmissionKind::Extended,
                },
            ));
        }
        if let Some(submission) = progress.in_flight {
            return Ok(Transition::stay(
                progress,
                TransitionOutcome::InFlight { submission },
            ));
        }
        if path != WizardPath::Extended || progress.step != WizardStep::TutorProfile {
            return Err(WizardError::WrongStep {
                operation: "submit_extended",
                expected: WizardStep::TutorProfile,
                actual: progress.step,
            });
        }
        if !progress.submitted.basic {
            return Err(ValidationFailure::AccountNotCreated.into());
        }

        validate_extended_profile(draft)?;
        Ok(Self::dispatch(progress, SubmissionKind::Extended))
    }

    fn dispatch(progress: &WizardProgress, submission: SubmissionKind) -> Transition {
        let mut next = progress.clone();
        next.in_flight = Some(submission);
        let action = match submission {
            SubmissionKind::Basic => WizardAction::CreateAccount,
            SubmissionKind::Extended => WizardAction::SubmitProfile,
        };
        Transition {
            progress: next,
            actions: vec![action],
            outcome: TransitionOutcome::Dispatched { submission },
        }
    }

    fn submission_succeeded(
        progress: &WizardProgress,
        path: WizardPath,
        submission: SubmissionKind,
    ) -> Transition {
        if progress.in_flight != Some(submission) {
            return Transition::stay(progress, TransitionOutcome::Unchanged);
        }

        let mut next = progress.clone();
        next.in_flight = None;
        match submission {
            SubmissionKind::Basic => next.submitted.basic = true,
            SubmissionKind::Extended => next.submitted.extended = true,
        }

        if next.is_completed(path) {
            return Transition {
                progress: next,
                actions: vec![WizardAction::ClearProgress],
                outcome: TransitionOutcome::Completed,
            };
        }

        // Basic account created on the extended path: continue to the profile.
        let from = next.step;
        next.step = path.last_step();
        Transition {
            progress: next,
            actions: Vec::new(),
            outcome: TransitionOutcome::Moved {
                from,
                to: path.last_step(),
            },
        }
    }
}
