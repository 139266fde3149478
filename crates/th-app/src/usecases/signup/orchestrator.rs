//! Signup wizard orchestrator.
//!
//! This module coordinates the wizard state machine with its side effects:
//! snapshot persistence, submission calls and attachment previews.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use th_core::ports::{
    BasicAccountRequest, ExtendedProfileRequest, KeyValueStorePort, SignupGatewayPort,
    SubmissionError,
};
use th_core::{
    Attachment, DraftField, FieldError, FieldValue, PersistedProgress, PreviewRegistry,
    SubmissionKind, TransitionOutcome, ValidationFailure, WizardAction, WizardError,
    WizardEvent, WizardStateMachine,
};

use crate::usecases::progress::{ClearProgress, LoadProgress, PersistenceError, SaveProgress};
use crate::usecases::signup::context::{PersistenceGuards, WizardContext, WizardState};
use crate::usecases::signup::view::{PersistenceWarning, WizardReport, WizardView};

/// Errors produced by the signup wizard.
#[derive(Debug, thiserror::Error)]
pub enum SignupWizardError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("{kind} submission failed: {source}")]
    Submission {
        kind: SubmissionKind,
        #[source]
        source: SubmissionError,
    },
}

impl SignupWizardError {
    /// The validation failure behind this error, if any.
    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            SignupWizardError::Wizard(err) => err.validation(),
            _ => None,
        }
    }
}

impl From<ValidationFailure> for SignupWizardError {
    fn from(failure: ValidationFailure) -> Self {
        SignupWizardError::Wizard(WizardError::Validation(failure))
    }
}

enum PendingSubmission {
    Basic(BasicAccountRequest),
    Extended(ExtendedProfileRequest),
}

impl PendingSubmission {
    fn kind(&self) -> SubmissionKind {
        match self {
            PendingSubmission::Basic(_) => SubmissionKind::Basic,
            PendingSubmission::Extended(_) => SubmissionKind::Extended,
        }
    }
}

/// Orchestrator that drives one signup wizard session.
///
/// 驱动单个注册向导会话的编排器。
pub struct SignupWizard {
    context: WizardContext,
    gateway: Arc<dyn SignupGatewayPort>,
    previews: PreviewRegistry,
    load_progress: LoadProgress,
    save_progress: SaveProgress,
    clear_progress: ClearProgress,
}

impl SignupWizard {
    pub fn new(
        store: Arc<dyn KeyValueStorePort>,
        gateway: Arc<dyn SignupGatewayPort>,
        progress_key: impl Into<String>,
    ) -> Self {
        Self::with_preview_registry(store, gateway, progress_key, PreviewRegistry::new())
    }

    pub fn with_preview_registry(
        store: Arc<dyn KeyValueStorePort>,
        gateway: Arc<dyn SignupGatewayPort>,
        progress_key: impl Into<String>,
        previews: PreviewRegistry,
    ) -> Self {
        let key = progress_key.into();
        Self {
            context: WizardContext::new(),
            gateway,
            previews,
            load_progress: LoadProgress::new(store.clone(), key.clone()),
            save_progress: SaveProgress::new(store.clone(), key.clone()),
            clear_progress: ClearProgress::new(store, key),
        }
    }

    pub async fn view(&self) -> WizardView {
        WizardView::of(&*self.context.lock().await)
    }

    pub async fn guards(&self) -> PersistenceGuards {
        self.context.lock().await.guards
    }

    /// Restore the stored snapshot. Runs once; later calls only report the view.
    ///
    /// A missing or unreadable snapshot leaves the defaults in place.
    pub async fn hydrate(&self) -> WizardReport {
        let span = info_span!("usecase.signup_wizard.hydrate");
        async {
            let mut state = self.context.lock().await;
            if state.guards.has_hydrated {
                debug!("signup wizard already hydrated");
                return Self::report(&state, TransitionOutcome::Unchanged, Vec::new());
            }

            let mut warnings = Vec::new();
            match self.load_progress.execute().await {
                Ok(Some(snapshot)) => {
                    let (progress, draft) = snapshot.restore(&state.draft);
                    info!(step = %progress.step, path = ?draft.path(), "signup progress restored");
                    state.progress = progress;
                    state.draft = draft;
                }
                Ok(None) => debug!("no stored signup progress"),
                Err(err) => {
                    warn!(error = %err, "stored signup progress ignored, using defaults");
                    warnings.push(PersistenceWarning::ReadFailed {
                        message: err.to_string(),
                    });
                }
            }
            state.guards.has_hydrated = true;

            Self::report(&state, TransitionOutcome::Unchanged, warnings)
        }
        .instrument(span)
        .await
    }

    /// Store `value` in `field` and persist the draft.
    pub async fn set_field(
        &self,
        field: DraftField,
        value: FieldValue,
    ) -> Result<WizardReport, SignupWizardError> {
        let span = info_span!("usecase.signup_wizard.set_field", field = %field);
        async {
            let mut state = self.context.lock().await;
            let path = state.draft.path();
            if state.progress.is_completed(path) {
                return Err(WizardError::Completed.into());
            }
            // The pending request was built from this draft.
            if let Some(submission) = state.progress.in_flight {
                debug!(submission = %submission, "edit refused while submission is pending");
                return Err(WizardError::SubmissionPending { submission }.into());
            }

            let previous_kind = state.draft.account_kind;
            state.draft.apply(field, value)?;

            if field == DraftField::AccountKind && state.draft.account_kind != previous_kind {
                if state.progress.submitted.basic {
                    state.draft.account_kind = previous_kind;
                    return Err(ValidationFailure::AccountKindLocked.into());
                }
                let path = state.draft.path();
                state.progress.clamp_to(path);
                debug!(path = ?path, step = %state.progress.step, "account kind changed");
            }

            if field.is_transient() {
                self.refresh_preview(&mut state, field);
            }

            let warnings = self.persist(&mut state).await;
            Ok(Self::report(&state, TransitionOutcome::Unchanged, warnings))
        }
        .instrument(span)
        .await
    }

    /// Parse `raw` for the field called `name`, then set it.
    pub async fn set_field_from_str(
        &self,
        name: &str,
        raw: &str,
    ) -> Result<WizardReport, SignupWizardError> {
        let field = th_core::draft::parse_field(name)?;
        let value = field.parse_value(raw)?;
        self.set_field(field, value).await
    }

    pub async fn attach(
        &self,
        field: DraftField,
        attachment: Option<Attachment>,
    ) -> Result<WizardReport, SignupWizardError> {
        self.set_field(field, FieldValue::Attachment(attachment)).await
    }

    pub async fn advance(&self) -> Result<WizardReport, SignupWizardError> {
        self.navigate(WizardEvent::Advance).await
    }

    pub async fn retreat(&self) -> Result<WizardReport, SignupWizardError> {
        self.navigate(WizardEvent::Retreat).await
    }

    pub async fn submit_basic(&self) -> Result<WizardReport, SignupWizardError> {
        self.submit(WizardEvent::SubmitBasic).await
    }

    pub async fn submit_extended(&self) -> Result<WizardReport, SignupWizardError> {
        self.submit(WizardEvent::SubmitExtended).await
    }

    /// Remove the stored snapshot and start over.
    pub async fn reset(&self) -> WizardReport {
        let span = info_span!("usecase.signup_wizard.reset");
        async {
            let mut state = self.context.lock().await;
            let mut warnings = Vec::new();
            if let Some(warning) = self.clear_stored(&mut state).await {
                warnings.push(warning);
            }
            state.reinitialize();
            warnings.extend(self.persist(&mut state).await);
            info!("signup wizard reset");

            Self::report(&state, TransitionOutcome::Reset, warnings)
        }
        .instrument(span)
        .await
    }

    async fn navigate(&self, event: WizardEvent) -> Result<WizardReport, SignupWizardError> {
        let span = info_span!("usecase.signup_wizard.navigate", event = ?event);
        async {
            let mut state = self.context.lock().await;
            let transition =
                WizardStateMachine::transition(&state.progress, &state.draft, event).map_err(
                    |err| {
                        debug!(error = %err, "signup navigation refused");
                        err
                    },
                )?;

            let changed = transition.progress != state.progress;
            info!(from = %state.progress.step, to = %transition.progress.step, "signup wizard transition");
            state.progress = transition.progress;

            let warnings = if changed {
                self.persist(&mut state).await
            } else {
                Vec::new()
            };
            Ok(Self::report(&state, transition.outcome, warnings))
        }
        .instrument(span)
        .await
    }

    async fn submit(&self, event: WizardEvent) -> Result<WizardReport, SignupWizardError> {
        let span = info_span!("usecase.signup_wizard.submit", event = ?event);
        async {
            let pending = {
                let mut state = self.context.lock().await;
                let transition =
                    WizardStateMachine::transition(&state.progress, &state.draft, event)?;

                let pending = match transition.actions.first() {
                    Some(WizardAction::CreateAccount) => Some(PendingSubmission::Basic(
                        BasicAccountRequest::from_draft(&state.draft),
                    )),
                    Some(WizardAction::SubmitProfile) => Some(PendingSubmission::Extended(
                        ExtendedProfileRequest::from_draft(&state.draft)?,
                    )),
                    _ => None,
                };

                state.progress = transition.progress;
                match pending {
                    Some(pending) => pending,
                    None => {
                        debug!(outcome = ?transition.outcome, "submission not dispatched");
                        return Ok(Self::report(&state, transition.outcome, Vec::new()));
                    }
                }
            };

            let kind = pending.kind();
            info!(submission = %kind, "dispatching submission");
            let result = match &pending {
                PendingSubmission::Basic(request) => self
                    .gateway
                    .create_account(request)
                    .await
                    .map(|receipt| Some(receipt.account_id)),
                PendingSubmission::Extended(request) => {
                    self.gateway.submit_profile(request).await.map(|()| None)
                }
            };

            let mut state = self.context.lock().await;
            match result {
                Ok(account_id) => {
                    // A reset during the round trip already dropped the submission.
                    let consumed = state.progress.in_flight == Some(kind);
                    let transition = WizardStateMachine::transition(
                        &state.progress,
                        &state.draft,
                        WizardEvent::SubmissionSucceeded(kind),
                    )?;
                    state.progress = transition.progress;
                    if consumed && account_id.is_some() {
                        state.account_id = account_id;
                    }
                    info!(submission = %kind, outcome = ?transition.outcome, "submission accepted");

                    let mut warnings = Vec::new();
                    for action in transition.actions {
                        if action == WizardAction::ClearProgress {
                            warnings.extend(self.finish(&mut state).await);
                        }
                    }
                    warnings.extend(self.persist(&mut state).await);
                    Ok(Self::report(&state, transition.outcome, warnings))
                }
                Err(source) => {
                    let transition = WizardStateMachine::transition(
                        &state.progress,
                        &state.draft,
                        WizardEvent::SubmissionFailed(kind),
                    )?;
                    state.progress = transition.progress;
                    warn!(submission = %kind, error = %source, "submission failed, draft kept for retry");
                    Err(SignupWizardError::Submission { kind, source })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Terminal success: drop the stored snapshot and the draft contents.
    ///
    /// Progress flags and the account kind stay in memory so repeated submits
    /// keep answering "already submitted".
    async fn finish(&self, state: &mut WizardState) -> Option<PersistenceWarning> {
        let warning = self.clear_stored(state).await;
        let account_kind = state.draft.account_kind;
        state.draft = Default::default();
        state.draft.account_kind = account_kind;
        state.previews.clear();
        info!("signup wizard completed");
        warning
    }

    async fn clear_stored(&self, state: &mut WizardState) -> Option<PersistenceWarning> {
        // Before hydration no write happens, so there is nothing to swallow.
        if state.guards.has_hydrated {
            state.guards.skip_next_persist = true;
        }
        match self.clear_progress.execute().await {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "failed to remove stored signup progress");
                Some(PersistenceWarning::ClearFailed {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Persistence trigger run after every draft or step change.
    async fn persist(&self, state: &mut WizardState) -> Vec<PersistenceWarning> {
        if !state.guards.has_hydrated {
            debug!("persist skipped: not hydrated yet");
            return Vec::new();
        }
        if std::mem::take(&mut state.guards.skip_next_persist) {
            debug!("persist skipped once after clearing");
            return Vec::new();
        }

        let snapshot = PersistedProgress::capture(&state.progress, &state.draft);
        match self.save_progress.execute(&snapshot).await {
            Ok(()) => Vec::new(),
            Err(err) => {
                Self::log_write_failure(&err);
                vec![PersistenceWarning::WriteFailed {
                    message: err.to_string(),
                }]
            }
        }
    }

    fn log_write_failure(err: &PersistenceError) {
        warn!(error = %err, "signup progress not saved, continuing with in-memory state");
    }

    fn refresh_preview(&self, state: &mut WizardState, field: DraftField) {
        // Dropping the old handle releases its preview.
        state.previews.remove(&field);
        if let Some(attachment) = state.draft.attachment(field) {
            let handle = self.previews.acquire(attachment);
            state.previews.insert(field, handle);
        }
    }

    fn report(
        state: &WizardState,
        outcome: TransitionOutcome,
        warnings: Vec<PersistenceWarning>,
    ) -> WizardReport {
        WizardReport {
            outcome,
            view: WizardView::of(state),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::progress::test_support::MockStore;
    use th_core::ports::{AccountReceipt, StorageError};
    use std::time::Duration;
    use th_core::{AccountKind, SubmissionKind, WizardStep};

    struct AcceptingGateway;

    /// Accepts every submission after a fixed delay.
    struct SlowGateway(Duration);

    #[async_trait::async_trait]
    impl SignupGatewayPort for SlowGateway {
        async fn create_account(
            &self,
            _request: &BasicAccountRequest,
        ) -> Result<AccountReceipt, SubmissionError> {
            tokio::time::sleep(self.0).await;
            Ok(AccountReceipt {
                account_id: "acct-slow".into(),
                created_at: Default::default(),
            })
        }

        async fn submit_profile(
            &self,
            _request: &ExtendedProfileRequest,
        ) -> Result<(), SubmissionError> {
            tokio::time::sleep(self.0).await;
            Ok(())
        }
    }

    async fn tutor_at_branch_step(wizard: &SignupWizard) {
        wizard.hydrate().await;
        let mut state = wizard.context.lock().await;
        state.draft.first_name = "Ada".into();
        state.draft.last_name = "Lovelace".into();
        state.draft.email = "ada@example.com".into();
        state.draft.account_kind = AccountKind::Tutor;
        state.draft.password = "analytical-engine".into();
        state.draft.password_confirmation = "analytical-engine".into();
        state.draft.terms_accepted = true;
        state.progress.step = WizardStep::Agreement;
    }

    #[async_trait::async_trait]
    impl SignupGatewayPort for AcceptingGateway {
        async fn create_account(
            &self,
            _request: &BasicAccountRequest,
        ) -> Result<AccountReceipt, SubmissionError> {
            Ok(AccountReceipt {
                account_id: "acct-1".into(),
                created_at: Default::default(),
            })
        }

        async fn submit_profile(
            &self,
            _request: &ExtendedProfileRequest,
        ) -> Result<(), SubmissionError> {
            Ok(())
        }
    }

    fn wizard(store: Arc<MockStore>) -> SignupWizard {
        SignupWizard::new(store, Arc::new(AcceptingGateway), "signup")
    }

    #[tokio::test]
    async fn nothing_is_written_before_hydration() {
        let store = Arc::new(MockStore::default());
        let wizard = wizard(store.clone());

        wizard
            .set_field(DraftField::FirstName, FieldValue::Text("Ada".into()))
            .await
            .unwrap();
        assert!(store.entries.lock().unwrap().is_empty());

        wizard.hydrate().await;
        wizard
            .set_field(DraftField::LastName, FieldValue::Text("Lovelace".into()))
            .await
            .unwrap();
        assert!(store.entries.lock().unwrap().contains_key("signup"));
    }

    #[tokio::test]
    async fn reset_before_hydration_does_not_swallow_first_write() {
        let store = Arc::new(MockStore::default());
        let wizard = wizard(store.clone());

        wizard.reset().await;
        wizard.hydrate().await;
        assert!(!wizard.guards().await.skip_next_persist);

        wizard
            .set_field(DraftField::FirstName, FieldValue::Text("Ada".into()))
            .await
            .unwrap();

        assert!(store.entries.lock().unwrap().contains_key("signup"));
    }

    #[tokio::test]
    async fn hydrate_runs_once() {
        let store = Arc::new(MockStore::default());
        let wizard = wizard(store.clone());
        wizard.hydrate().await;
        wizard
            .set_field(DraftField::FirstName, FieldValue::Text("Ada".into()))
            .await
            .unwrap();

        store.entries.lock().unwrap().insert(
            "signup".into(),
            r#"{"step":0,"draft":{"firstName":"Someone else"}}"#.into(),
        );
        let report = wizard.hydrate().await;

        assert_eq!(report.view.draft.first_name, "Ada");
    }

    #[tokio::test]
    async fn write_failure_is_a_warning() {
        let store = Arc::new(MockStore::default());
        *store.fail_writes.lock().unwrap() = Some(StorageError::QuotaExceeded {
            needed: 100,
            available: 1,
        });
        let wizard = wizard(store);
        wizard.hydrate().await;

        let report = wizard
            .set_field(DraftField::Email, FieldValue::Text("ada@example.com".into()))
            .await
            .unwrap();

        assert!(matches!(
            report.warnings.as_slice(),
            [PersistenceWarning::WriteFailed { .. }]
        ));
        assert_eq!(report.view.draft.email, "ada@example.com");
    }

    #[tokio::test]
    async fn switching_to_simple_path_clamps_step() {
        let wizard = wizard(Arc::new(MockStore::default()));
        {
            let mut state = wizard.context.lock().await;
            state.draft.account_kind = AccountKind::Tutor;
            state.progress.step = WizardStep::TutorProfile;
        }

        let report = wizard
            .set_field_from_str("account_kind", "student")
            .await
            .unwrap();

        assert_eq!(report.view.step, WizardStep::Agreement);
    }

    #[tokio::test]
    async fn account_kind_is_locked_after_basic_submission() {
        let wizard = wizard(Arc::new(MockStore::default()));
        {
            let mut state = wizard.context.lock().await;
            state.draft.account_kind = AccountKind::Tutor;
            state.progress.submitted.basic = true;
            state.progress.step = WizardStep::TutorProfile;
        }

        let err = wizard
            .set_field_from_str("account_kind", "student")
            .await
            .unwrap_err();

        assert_eq!(err.validation(), Some(&ValidationFailure::AccountKindLocked));
        assert_eq!(wizard.view().await.draft.account_kind, AccountKind::Tutor);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_are_refused_while_basic_submission_is_pending() {
        let wizard = SignupWizard::new(
            Arc::new(MockStore::default()),
            Arc::new(SlowGateway(Duration::from_millis(50))),
            "signup",
        );
        tutor_at_branch_step(&wizard).await;

        let (submitted, kind_change, email_change) = tokio::join!(
            wizard.submit_basic(),
            wizard.set_field_from_str("account_kind", "student"),
            wizard.set_field_from_str("email", "eve@example.com"),
        );

        for err in [kind_change.unwrap_err(), email_change.unwrap_err()] {
            assert!(matches!(
                err,
                SignupWizardError::Wizard(WizardError::SubmissionPending {
                    submission: SubmissionKind::Basic
                })
            ));
        }
        let report = submitted.unwrap();
        assert_eq!(report.view.step, WizardStep::TutorProfile);
        assert_eq!(report.view.draft.account_kind, AccountKind::Tutor);
        assert_eq!(report.view.draft.email, "ada@example.com");
        assert!(!report.view.completed);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_submission_discards_account_id() {
        let store = Arc::new(MockStore::default());
        let wizard = SignupWizard::new(
            store,
            Arc::new(SlowGateway(Duration::from_millis(50))),
            "signup",
        );
        tutor_at_branch_step(&wizard).await;

        let (submitted, reset) = tokio::join!(wizard.submit_basic(), wizard.reset());

        assert_eq!(reset.outcome, TransitionOutcome::Reset);
        let report = submitted.unwrap();
        assert_eq!(report.outcome, TransitionOutcome::Unchanged);
        assert!(report.view.account_id.is_none());
        assert!(!report.view.submitted.basic);
        assert_eq!(report.view.step, WizardStep::Account);
    }
}
