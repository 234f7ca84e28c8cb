//! Identity synchronizer — one-way sync from the current user into the draft.
//!
//! Every non-absent identity snapshot overwrites the whole draft; unsaved
//! local edits are discarded (last event wins). Absent snapshots are ignored.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::draft::DraftStore;
use super::model::{ExternalIdentity, ProfileDraft};

pub struct IdentitySynchronizer {
    draft: Arc<DraftStore>,
}

impl IdentitySynchronizer {
    pub fn new(draft: Arc<DraftStore>) -> Self {
        Self { draft }
    }

    /// Apply one identity snapshot. Returns whether the draft was overwritten.
    pub fn apply(&self, identity: Option<&ExternalIdentity>) -> bool {
        let Some(identity) = identity else {
            debug!("Identity not loaded; keeping current draft");
            return false;
        };

        let draft = ProfileDraft::from_identity(identity, self.draft.default_avatar());
        let changed = self.draft.replace(draft);
        info!(changed, "Draft replaced from identity snapshot");
        true
    }

    /// Apply every snapshot the receiver has not yet seen, until the
    /// identity source is dropped.
    ///
    /// The snapshot the draft was seeded from is not re-applied, so edits
    /// made before the task first runs survive.
    pub async fn run(self, mut identity: watch::Receiver<Option<ExternalIdentity>>) {
        while identity.changed().await.is_ok() {
            let next = identity.borrow_and_update().clone();
            self.apply(next.as_ref());
        }
        debug!("Identity source closed; synchronizer stopped");
    }

    /// Run on a background task.
    pub fn spawn(self, identity: watch::Receiver<Option<ExternalIdentity>>) -> JoinHandle<()> {
        tokio::spawn(self.run(identity))
    }
}
