//! OnboardingController — composes the draft, identity sync, avatar
//! randomizer, and submission orchestrator behind one surface.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::OnboardingApi;
use crate::config::OnboardingConfig;
use crate::error::ControllerError;
use crate::notify::Notifier;

use super::avatar::AvatarRandomizer;
use super::cache::QueryCache;
use super::draft::DraftStore;
use super::identity::IdentitySynchronizer;
use super::model::{AvatarTemplate, ExternalIdentity, ProfileDraft, ProfileField};
use super::state::{SubmissionState, SubmissionStatus};
use super::submission::SubmissionOrchestrator;

pub const SUBMIT_LABEL: &str = "Complete Onboarding";
pub const SUBMIT_PENDING_LABEL: &str = "Onboarding...";

/// Everything a view needs to render the form.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub draft: ProfileDraft,
    pub submission: SubmissionState,
    pub submit_label: &'static str,
}

/// The "complete your profile" controller.
pub struct OnboardingController {
    draft: Arc<DraftStore>,
    avatar: AvatarRandomizer,
    submission: SubmissionOrchestrator,
}

impl OnboardingController {
    /// Mount the controller, seeding the draft from whatever identity is
    /// available right now.
    pub fn new(
        config: &OnboardingConfig,
        identity: &watch::Receiver<Option<ExternalIdentity>>,
        api: Arc<dyn OnboardingApi>,
        cache: Arc<dyn QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let template = AvatarTemplate::new(config.avatar_template.clone());
        let default_avatar = template.default_url();

        let initial = match identity.borrow().as_ref() {
            Some(user) => ProfileDraft::from_identity(user, &default_avatar),
            None => ProfileDraft::empty(&default_avatar),
        };
        let draft = Arc::new(DraftStore::new(initial, default_avatar));

        let avatar = AvatarRandomizer::new(Arc::clone(&draft), template, Arc::clone(&notifier));
        let submission = SubmissionOrchestrator::new(
            Arc::clone(&draft),
            api,
            cache,
            notifier,
            config.identity_query_key.clone(),
        );

        Self {
            draft,
            avatar,
            submission,
        }
    }

    /// Keep the draft in sync with the identity source on a background task.
    pub fn start_identity_sync(
        &self,
        identity: watch::Receiver<Option<ExternalIdentity>>,
    ) -> JoinHandle<()> {
        IdentitySynchronizer::new(Arc::clone(&self.draft)).spawn(identity)
    }

    pub fn draft(&self) -> ProfileDraft {
        self.draft.snapshot()
    }

    pub fn subscribe_draft(&self) -> watch::Receiver<ProfileDraft> {
        self.draft.subscribe()
    }

    pub fn set_field(&self, field: ProfileField, value: impl Into<String>) -> bool {
        self.draft.set_field(field, value)
    }

    /// Set a field by its wire name (e.g. `"fullName"`).
    pub fn set_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<bool, ControllerError> {
        let field: ProfileField = name.parse()?;
        Ok(self.draft.set_field(field, value))
    }

    pub fn randomize_avatar(&self) -> String {
        self.avatar.randomize()
    }

    /// Report that the avatar image failed to load; returns the fallback to show.
    pub fn avatar_load_failed(&self, failed_url: &str) -> String {
        self.avatar.load_failed(failed_url)
    }

    pub async fn submit(&self) -> SubmissionStatus {
        self.submission.submit().await
    }

    /// Run a submission on a background task, unless one is already pending.
    ///
    /// The draft snapshot and the pending flag are taken before this returns,
    /// so a second call made while the request is in flight gets `None`.
    pub fn spawn_submit(self: &Arc<Self>) -> Option<JoinHandle<SubmissionStatus>> {
        if self.is_pending() {
            debug!("Submission already pending; ignoring submit");
            return None;
        }
        let pending = self.submission.start();
        let controller = Arc::clone(self);
        Some(tokio::spawn(async move {
            controller.submission.finish(pending).await
        }))
    }

    pub fn is_pending(&self) -> bool {
        self.submission.is_pending()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    pub fn subscribe_submission(&self) -> watch::Receiver<SubmissionState> {
        self.submission.subscribe()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            SUBMIT_PENDING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn status(&self) -> OnboardingStatus {
        OnboardingStatus {
            draft: self.draft(),
            submission: self.submission_state(),
            submit_label: self.submit_label(),
        }
    }
}
