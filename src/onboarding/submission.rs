//! Submission orchestrator — sends the draft and reacts to the outcome.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::OnboardingApi;
use crate::error::SubmitError;
use crate::notify::{NotificationKind, Notifier};

use super::cache::QueryCache;
use super::draft::DraftStore;
use super::model::ProfileDraft;
use super::state::{SubmissionState, SubmissionStatus};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Profile onboarded successfully 🎉";
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Something went wrong";

/// Message shown to the user for a failed submission.
pub fn failure_message(error: &SubmitError) -> String {
    error
        .payload_message()
        .unwrap_or(SUBMIT_FALLBACK_MESSAGE)
        .to_string()
}

/// A submission whose draft snapshot has been taken but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub attempt: Uuid,
    pub draft: ProfileDraft,
}

/// Coordinates one submit-and-react workflow at a time.
///
/// Concurrent calls are not rejected; the exposed pending flag is what the
/// caller uses to keep the submit control disabled.
pub struct SubmissionOrchestrator {
    draft: Arc<DraftStore>,
    api: Arc<dyn OnboardingApi>,
    cache: Arc<dyn QueryCache>,
    notifier: Arc<dyn Notifier>,
    identity_query_key: String,
    state: watch::Sender<SubmissionState>,
}

impl SubmissionOrchestrator {
    pub fn new(
        draft: Arc<DraftStore>,
        api: Arc<dyn OnboardingApi>,
        cache: Arc<dyn QueryCache>,
        notifier: Arc<dyn Notifier>,
        identity_query_key: impl Into<String>,
    ) -> Self {
        let (state, _rx) = watch::channel(SubmissionState::default());
        Self {
            draft,
            api,
            cache,
            notifier,
            identity_query_key: identity_query_key.into(),
            state,
        }
    }

    /// Current submission state (status plus last outcome).
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Observe submission state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Submit a snapshot of the current draft.
    ///
    /// Edits made while the request is in flight do not affect it. Returns
    /// the status this attempt settled with.
    pub async fn submit(&self) -> SubmissionStatus {
        let pending = self.start();
        self.finish(pending).await
    }

    /// Snapshot the draft and enter the pending state without awaiting.
    ///
    /// Callers that run the request on another task use this so the pending
    /// flag is set before control returns to them.
    pub fn start(&self) -> PendingSubmission {
        let draft = self.draft.snapshot();
        let attempt = Uuid::new_v4();

        let previous = self.state.send_replace(SubmissionState::pending(attempt));
        if !previous.status.accepts_submit() {
            debug!(%attempt, "Submitting while another submission is pending");
        }
        info!(%attempt, "Submitting onboarding profile");

        PendingSubmission { attempt, draft }
    }

    /// Send a started submission and react to its outcome.
    pub async fn finish(&self, pending: PendingSubmission) -> SubmissionStatus {
        let PendingSubmission { attempt, draft } = pending;
        let started = Instant::now();
        let result = self.api.complete_onboarding(&draft).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(()) => {
                info!(%attempt, elapsed_ms, "Onboarding submission succeeded");
                self.notifier
                    .notify(NotificationKind::Success, SUBMIT_SUCCESS_MESSAGE);
                self.cache.invalidate(&self.identity_query_key);
                Ok(())
            }
            Err(e) => {
                let message = failure_message(&e);
                warn!(%attempt, elapsed_ms, error = %e, "Onboarding submission failed");
                self.notifier.notify(NotificationKind::Error, &message);
                Err(message)
            }
        };

        let status = if outcome.is_ok() {
            SubmissionStatus::Succeeded
        } else {
            SubmissionStatus::Failed
        };
        self.state.send_if_modified(|state| {
            if state.attempt != Some(attempt) {
                debug!(%attempt, "Newer submission started; not recording this outcome");
                return false;
            }
            match state.settle(outcome) {
                Ok(_) => true,
                Err(e) => {
                    warn!(%attempt, "Failed to settle submission: {}", e);
                    false
                }
            }
        });
        status
    }
}
