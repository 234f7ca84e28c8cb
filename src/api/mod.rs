//! Remote service boundary.
//!
//! The controller talks to the backend only through these traits; the
//! `http` module provides the reqwest-backed implementation.

pub mod http;

pub use http::HttpOnboardingApi;

use async_trait::async_trait;

use crate::error::{IdentityError, SubmitError};
use crate::onboarding::model::{ExternalIdentity, ProfileDraft};

/// The remote "complete onboarding" operation.
#[async_trait]
pub trait OnboardingApi: Send + Sync {
    async fn complete_onboarding(&self, draft: &ProfileDraft) -> Result<(), SubmitError>;
}

/// Source of the authenticated user record.
#[async_trait]
pub trait IdentityFetcher: Send + Sync {
    /// `Ok(None)` when no user is signed in.
    async fn current_user(&self) -> Result<Option<ExternalIdentity>, IdentityError>;
}
