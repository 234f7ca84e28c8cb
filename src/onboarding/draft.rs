//! Draft state holder — owns the profile draft and propagates changes.

use tokio::sync::watch;
use tracing::debug;

use super::model::{ProfileDraft, ProfileField};

/// Holds the current [`ProfileDraft`].
///
/// Subscribers are notified only when the draft actually changes.
#[derive(Debug)]
pub struct DraftStore {
    tx: watch::Sender<ProfileDraft>,
    default_avatar: String,
}

impl DraftStore {
    pub fn new(initial: ProfileDraft, default_avatar: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            default_avatar: default_avatar.into(),
        }
    }

    /// A detached copy of the current draft.
    pub fn snapshot(&self) -> ProfileDraft {
        self.tx.borrow().clone()
    }

    /// Observe draft changes (re-render hook).
    pub fn subscribe(&self) -> watch::Receiver<ProfileDraft> {
        self.tx.subscribe()
    }

    pub fn default_avatar(&self) -> &str {
        &self.default_avatar
    }

    /// Replace exactly one field. Returns whether the draft changed.
    ///
    /// An empty avatar is stored as the default avatar.
    pub fn set_field(&self, field: ProfileField, value: impl Into<String>) -> bool {
        let mut value = value.into();
        if field == ProfileField::ProfilePic && value.is_empty() {
            value = self.default_avatar.clone();
        }
        let changed = self.tx.send_if_modified(|draft| draft.set(field, value));
        if changed {
            debug!(field = %field, "Draft field updated");
        }
        changed
    }

    /// Replace the whole draft. Returns whether the draft changed.
    pub fn replace(&self, draft: ProfileDraft) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == draft {
                false
            } else {
                *current = draft;
                true
            }
        })
    }
}
