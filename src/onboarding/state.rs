//! Submission state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a profile submission.
///
/// Idle → Pending → (Succeeded | Failed). Settled states accept a new
/// submission, which moves back to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, target),
            (Idle, Pending)
                | (Pending, Succeeded)
                | (Pending, Failed)
                | (Succeeded, Pending)
                | (Failed, Pending)
        )
    }

    /// Whether the last submission has settled.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether a new submission may be started.
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Externally observable submission state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub status: SubmissionStatus,
    /// Id of the latest attempt, if any.
    pub attempt: Option<Uuid>,
    /// When the latest attempt settled.
    pub settled_at: Option<DateTime<Utc>>,
    /// Message shown to the user when the latest attempt failed.
    pub error_message: Option<String>,
}

impl SubmissionState {
    /// State for a freshly started attempt.
    pub fn pending(attempt: Uuid) -> Self {
        Self {
            status: SubmissionStatus::Pending,
            attempt: Some(attempt),
            settled_at: None,
            error_message: None,
        }
    }

    /// Settle the current attempt.
    pub fn settle(&mut self, outcome: Result<(), String>) -> Result<SubmissionStatus, String> {
        let target = if outcome.is_ok() {
            SubmissionStatus::Succeeded
        } else {
            SubmissionStatus::Failed
        };
        if !self.status.can_transition_to(target) {
            return Err(format!("Cannot transition from {} to {}", self.status, target));
        }
        self.status = target;
        self.settled_at = Some(Utc::now());
        self.error_message = outcome.err();
        Ok(target)
    }

    /// Whether a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }
}
