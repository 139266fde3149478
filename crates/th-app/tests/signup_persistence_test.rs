use std::collections::BTreeSet;
use std::sync::Arc;

use th_app::usecases::{PersistenceWarning, SignupWizard};
use th_core::ports::KeyValueStorePort;
use th_core::{AccountKind, Attachment, DraftField, Interest, PreviewRegistry, WizardStep};
use th_infra::{FileKeyValueStore, InMemoryKeyValueStore, SimulatedSignupGateway};

const KEY: &str = "tutorhub.signup.progress";

fn wizard_over(store: Arc<dyn KeyValueStorePort>) -> SignupWizard {
    SignupWizard::new(store, Arc::new(SimulatedSignupGateway::instant()), KEY)
}

async fn set(wizard: &SignupWizard, field: &str, value: &str) {
    wizard
        .set_field_from_str(field, value)
        .await
        .unwrap_or_else(|err| panic!("set {field}: {err}"));
}

#[tokio::test]
async fn persistence_reload_restores_every_field_but_attachments() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let wizard = wizard_over(store.clone());
    wizard.hydrate().await;

    set(&wizard, "first_name", "Grace").await;
    set(&wizard, "last_name", "Hopper").await;
    set(&wizard, "email", "grace@example.com").await;
    set(&wizard, "account_kind", "tutor").await;
    wizard.advance().await.unwrap();
    set(&wizard, "password", "cobol-forever").await;
    set(&wizard, "password_confirmation", "cobol-forever").await;
    wizard.advance().await.unwrap();
    set(&wizard, "marketing_opt_in", "on").await;
    set(&wizard, "headline", "Compilers").await;
    set(&wizard, "interests", "computer_science,mathematics").await;
    wizard
        .attach(
            DraftField::IntroVideo,
            Some(Attachment::new("intro.mp4", "video/mp4", vec![7u8; 32])),
        )
        .await
        .unwrap();
    let before = wizard.view().await;
    drop(wizard);

    let reloaded = wizard_over(store);
    let after = reloaded.hydrate().await.view;

    assert_eq!(after.step, WizardStep::Agreement);
    assert_eq!(after.step_index, before.step_index);
    assert_eq!(after.draft.first_name, "Grace");
    assert_eq!(after.draft.account_kind, AccountKind::Tutor);
    assert_eq!(after.draft.password, "cobol-forever");
    assert!(after.draft.marketing_opt_in);
    assert_eq!(
        after.draft.interests,
        BTreeSet::from([Interest::ComputerScience, Interest::Mathematics])
    );
    assert!(after.draft.intro_video.is_none());
    assert!(after.attachments.is_empty());

    let mut expected = before.draft.clone();
    expected.intro_video = None;
    assert_eq!(after.draft, expected);
}

#[tokio::test]
async fn persistence_out_of_range_step_is_clamped() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store
        .insert_raw(
            KEY,
            r#"{"step":99,"submittedFlags":{"basic":false,"extended":false},"draft":{"accountKind":"student"}}"#,
        )
        .await;

    let report = wizard_over(store).hydrate().await;

    assert_eq!(report.view.step_index, 2);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn persistence_extended_step_is_clamped_to_profile() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store
        .insert_raw(KEY, r#"{"step":9,"submittedFlags":{"basic":true},"draft":{"accountKind":"tutor"}}"#)
        .await;

    let report = wizard_over(store).hydrate().await;

    assert_eq!(report.view.step, WizardStep::TutorProfile);
    assert!(report.view.submitted.basic);
}

#[tokio::test]
async fn persistence_malformed_snapshot_falls_back_to_defaults() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store.insert_raw(KEY, "{\"step\": \"three\"").await;

    let report = wizard_over(store).hydrate().await;

    assert_eq!(report.view.step_index, 0);
    assert!(report.view.guards.has_hydrated);
    assert!(matches!(
        report.warnings.as_slice(),
        [PersistenceWarning::ReadFailed { .. }]
    ));
}

#[tokio::test]
async fn persistence_partial_draft_is_merged_over_defaults() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store
        .insert_raw(KEY, r#"{"step":1,"draft":{"email":"ada@example.com"}}"#)
        .await;

    let view = wizard_over(store).hydrate().await.view;

    assert_eq!(view.step, WizardStep::Credentials);
    assert_eq!(view.draft.email, "ada@example.com");
    assert_eq!(view.draft.account_kind, AccountKind::Student);
    assert!(!view.submitted.basic);
}

#[tokio::test]
async fn persistence_quota_failure_is_non_fatal() {
    let store = Arc::new(InMemoryKeyValueStore::with_quota(64));
    let wizard = wizard_over(store.clone());
    wizard.hydrate().await;

    let report = wizard
        .set_field_from_str("bio", &"long biography ".repeat(20))
        .await
        .expect("edit survives a failed write");

    assert!(matches!(
        report.warnings.as_slice(),
        [PersistenceWarning::WriteFailed { .. }]
    ));
    assert!(report.view.draft.bio.starts_with("long biography"));
    assert!(store.get(KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn persistence_reset_clears_snapshot_and_reinitializes() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let wizard = wizard_over(store.clone());
    wizard.hydrate().await;
    set(&wizard, "first_name", "Ada").await;
    assert!(store.get(KEY).await.unwrap().is_some());

    let report = wizard.reset().await;

    assert_eq!(report.view.step_index, 0);
    assert!(report.view.draft.first_name.is_empty());
    assert!(store.get(KEY).await.unwrap().is_none());
    assert!(!report.view.guards.skip_next_persist);

    set(&wizard, "first_name", "Grace").await;
    assert!(store.get(KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn persistence_completion_removes_snapshot() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let wizard = wizard_over(store.clone());
    wizard.hydrate().await;
    set(&wizard, "first_name", "Ada").await;
    set(&wizard, "last_name", "Lovelace").await;
    set(&wizard, "email", "ada@example.com").await;
    wizard.advance().await.unwrap();
    set(&wizard, "password", "analytical-engine").await;
    set(&wizard, "password_confirmation", "analytical-engine").await;
    wizard.advance().await.unwrap();
    set(&wizard, "terms_accepted", "true").await;

    wizard.submit_basic().await.unwrap();

    assert!(store.get(KEY).await.unwrap().is_none());
    let fresh = wizard_over(store).hydrate().await.view;
    assert_eq!(fresh.step_index, 0);
    assert!(!fresh.submitted.basic);
}

#[tokio::test]
async fn persistence_file_store_survives_new_session() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf()));
    let wizard = wizard_over(store);
    wizard.hydrate().await;
    set(&wizard, "first_name", "Ada").await;
    set(&wizard, "last_name", "Lovelace").await;
    set(&wizard, "email", "ada@example.com").await;
    wizard.advance().await.unwrap();
    drop(wizard);

    let store = Arc::new(FileKeyValueStore::with_defaults(temp_dir.path().to_path_buf()));
    let view = wizard_over(store).hydrate().await.view;

    assert_eq!(view.step, WizardStep::Credentials);
    assert_eq!(view.draft.last_name, "Lovelace");
}

#[tokio::test]
async fn persistence_preview_handles_follow_attachment_lifetime() {
    let registry = PreviewRegistry::new();
    let wizard = SignupWizard::with_preview_registry(
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(SimulatedSignupGateway::instant()),
        KEY,
        registry.clone(),
    );
    wizard.hydrate().await;

    let first = Attachment::new("one.webm", "video/webm", vec![1u8; 4]);
    let report = wizard
        .attach(DraftField::IntroVideo, Some(first.clone()))
        .await
        .unwrap();
    assert_eq!(registry.live_count(), 1);
    assert!(registry.is_live(first.id()));
    let url = report.view.attachments[0].preview_url.clone().unwrap();
    assert!(url.starts_with("preview://"));

    let second = Attachment::new("two.webm", "video/webm", vec![2u8; 4]);
    wizard
        .attach(DraftField::IntroVideo, Some(second.clone()))
        .await
        .unwrap();
    assert_eq!(registry.live_count(), 1);
    assert!(!registry.is_live(first.id()));

    wizard
        .attach(DraftField::ProfilePhoto, Some(Attachment::new("me.png", "image/png", vec![3u8; 4])))
        .await
        .unwrap();
    assert_eq!(registry.live_count(), 2);

    wizard.attach(DraftField::IntroVideo, None).await.unwrap();
    assert_eq!(registry.live_count(), 1);

    drop(wizard);
    assert_eq!(registry.live_count(), 0);
}

#[tokio::test]
async fn persistence_hydration_keeps_session_attachments() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store
        .insert_raw(KEY, r#"{"step":1,"draft":{"accountKind":"tutor","headline":"Maths"}}"#)
        .await;
    let wizard = wizard_over(store);
    wizard
        .attach(
            DraftField::IntroVideo,
            Some(Attachment::new("intro.webm", "video/webm", vec![9u8; 8])),
        )
        .await
        .unwrap();

    let view = wizard.hydrate().await.view;

    assert_eq!(view.draft.headline, "Maths");
    assert!(view.draft.intro_video.is_some());
    assert_eq!(view.attachments.len(), 1);
}
