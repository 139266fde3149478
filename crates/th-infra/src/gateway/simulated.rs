//! Simulated signup backend
//!
//! Stands in for the account service when no live backend is available: each
//! call completes after a fixed delay. Failures can be queued to exercise the
//! retry path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use th_core::ports::{
    AccountReceipt, BasicAccountRequest, ExtendedProfileRequest, SignupGatewayPort,
    SubmissionError,
};
use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub struct SimulatedSignupGateway {
    delay: Duration,
    queued_failures: Mutex<VecDeque<SubmissionError>>,
    account_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl SimulatedSignupGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            queued_failures: Mutex::new(VecDeque::new()),
            account_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    /// Gateway that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Make the next call (of either kind) fail with `error`.
    pub async fn fail_next_with(&self, error: SubmissionError) {
        self.queued_failures.lock().await.push_back(error);
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) -> Result<(), SubmissionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.queued_failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SignupGatewayPort for SimulatedSignupGateway {
    async fn create_account(
        &self,
        request: &BasicAccountRequest,
    ) -> Result<AccountReceipt, SubmissionError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        let span = info_span!("infra.simulated_gateway.create_account", email = %request.email);
        async {
            self.round_trip().await?;
            let receipt = AccountReceipt {
                account_id: Uuid::new_v4().to_string(),
                created_at: Utc::now(),
            };
            info!(account_id = %receipt.account_id, kind = %request.account_kind, "account created");
            Ok(receipt)
        }
        .instrument(span)
        .await
    }

    async fn submit_profile(&self, request: &ExtendedProfileRequest) -> Result<(), SubmissionError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        let span = info_span!("infra.simulated_gateway.submit_profile", email = %request.email);
        async {
            self.round_trip().await?;
            info!(
                interests = request.interests.len(),
                video_bytes = request.intro_video.len(),
                "tutor profile submitted"
            );
            Ok(())
        }
        .instrument(span)
        .await
    }
}
