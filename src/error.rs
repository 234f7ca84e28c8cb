//! Error types for the onboarding controller.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {reason}")]
    HttpClient { reason: String },
}

/// Failures of the remote "complete onboarding" operation.
///
/// Transport failures and remote rejections are both submission failures;
/// the orchestrator does not distinguish them beyond message extraction.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Request failed: {reason}")]
    Transport { reason: String },

    #[error("Rejected with status {status}")]
    Rejected {
        status: u16,
        /// Parsed response body, when the server sent JSON.
        payload: Option<serde_json::Value>,
    },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl SubmitError {
    /// The `message` field of the structured response payload, if any.
    pub fn payload_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                payload: Some(payload),
                ..
            } => payload.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }
}

/// Failures fetching the current user.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Identity request returned status {status}")]
    Status { status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while interpreting user input.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
