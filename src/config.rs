//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Avatar URL template; `{seed}` is replaced by the avatar seed.
pub const DEFAULT_AVATAR_TEMPLATE: &str = "https://api.dicebear.com/7.x/adventurer/svg?seed={seed}";

/// Onboarding controller configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Base URL of the remote API (no trailing slash).
    pub api_base_url: String,
    /// Avatar URL template containing a `{seed}` placeholder.
    pub avatar_template: String,
    /// Timeout for each remote request.
    pub request_timeout: Duration,
    /// Query key under which the current identity is cached.
    pub identity_query_key: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/api".to_string(),
            avatar_template: DEFAULT_AVATAR_TEMPLATE.to_string(),
            request_timeout: Duration::from_secs(15),
            identity_query_key: "authUser".to_string(),
        }
    }
}

impl OnboardingConfig {
    /// Build from `ONBOARDING_*` environment variables, falling back to defaults.
    pub fn from_env() -> crate::error::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ONBOARDING_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "ONBOARDING_API_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.api_base_url = url;
        }

        if let Some(template) = lookup("ONBOARDING_AVATAR_TEMPLATE") {
            if !template.contains("{seed}") {
                return Err(ConfigError::InvalidValue {
                    key: "ONBOARDING_AVATAR_TEMPLATE".into(),
                    message: "must contain a {seed} placeholder".into(),
                });
            }
            config.avatar_template = template;
        }

        if let Some(secs) = lookup("ONBOARDING_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "ONBOARDING_REQUEST_TIMEOUT_SECS".into(),
                message: format!("{e}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "ONBOARDING_REQUEST_TIMEOUT_SECS".into(),
                    message: "must be at least 1".into(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(key) = lookup("ONBOARDING_IDENTITY_QUERY_KEY") {
            if !key.trim().is_empty() {
                config.identity_query_key = key.trim().to_string();
            }
        }

        Ok(config)
    }
}
