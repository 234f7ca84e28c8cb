//! HTTP client for the onboarding backend.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{IdentityFetcher, OnboardingApi};
use crate::config::OnboardingConfig;
use crate::error::{ConfigError, IdentityError, SubmitError};
use crate::onboarding::model::{ExternalIdentity, ProfileDraft};

/// Response body of `GET /auth/me`.
#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    user: Option<ExternalIdentity>,
}

/// reqwest-backed implementation of [`OnboardingApi`] and [`IdentityFetcher`].
pub struct HttpOnboardingApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOnboardingApi {
    pub fn new(config: &OnboardingConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl OnboardingApi for HttpOnboardingApi {
    async fn complete_onboarding(&self, draft: &ProfileDraft) -> Result<(), SubmitError> {
        let resp = self
            .client
            .post(self.api_url("auth/onboarding"))
            .json(draft)
            .send()
            .await
            .map_err(|e| SubmitError::Transport {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status.is_success() {
            debug!(status = %status, "Onboarding accepted");
            return Ok(());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SubmitError::InvalidResponse {
                reason: format!("status {status}, unreadable body: {e}"),
            })?;
        let payload = serde_json::from_str::<serde_json::Value>(&body).ok();
        if payload.is_none() {
            warn!(status = %status, "Onboarding rejected with a non-JSON body");
        }
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            payload,
        })
    }
}

#[async_trait]
impl IdentityFetcher for HttpOnboardingApi {
    async fn current_user(&self) -> Result<Option<ExternalIdentity>, IdentityError> {
        let resp = self
            .client
            .get(self.api_url("auth/me"))
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| IdentityError::RequestFailed {
                reason: e.to_string(),
            })?;
        let me: MeResponse = serde_json::from_str(&body)?;
        Ok(me.user)
    }
}
