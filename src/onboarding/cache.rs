//! Query cache for the current identity.
//!
//! `IdentityQuery` owns the reactive identity snapshot. Invalidating its key
//! refetches the user in the background and publishes the result to every
//! subscriber (the identity synchronizer among them).
//!
//! Every fetch takes a generation number when it is issued. A result is only
//! published if no later generation has been published already, so a slow
//! response cannot overwrite a fresher one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::IdentityFetcher;
use crate::error::IdentityError;

use super::model::ExternalIdentity;

/// Cache invalidation signal.
pub trait QueryCache: Send + Sync {
    /// Mark the data cached under `key` as stale.
    fn invalidate(&self, key: &str);
}

/// Reactive cache entry for the current user.
#[derive(Clone)]
pub struct IdentityQuery {
    key: String,
    fetcher: Arc<dyn IdentityFetcher>,
    tx: Arc<watch::Sender<Option<ExternalIdentity>>>,
    issued: Arc<AtomicU64>,
    published: Arc<AtomicU64>,
}

impl IdentityQuery {
    /// Create an empty (not yet loaded) query under `key`.
    pub fn new(key: impl Into<String>, fetcher: Arc<dyn IdentityFetcher>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            key: key.into(),
            fetcher,
            tx: Arc::new(tx),
            issued: Arc::new(AtomicU64::new(0)),
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The latest identity snapshot, if loaded.
    pub fn current(&self) -> Option<ExternalIdentity> {
        self.tx.borrow().clone()
    }

    /// Observe identity snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Option<ExternalIdentity>> {
        self.tx.subscribe()
    }

    /// Fetch the user and publish the result.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn refetch(&self) -> Result<(), IdentityError> {
        let generation = self.next_generation();
        self.fetch(generation).await
    }

    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch(&self, generation: u64) -> Result<(), IdentityError> {
        let user = self.fetcher.current_user().await?;
        let signed_in = user.is_some();

        let published = &self.published;
        let fresh = self.tx.send_if_modified(|current| {
            if generation <= published.load(Ordering::SeqCst) {
                return false;
            }
            published.store(generation, Ordering::SeqCst);
            *current = user;
            true
        });

        if fresh {
            info!(key = %self.key, generation, signed_in, "Identity refreshed");
        } else {
            debug!(key = %self.key, generation, "Dropping superseded identity response");
        }
        Ok(())
    }
}

impl QueryCache for IdentityQuery {
    fn invalidate(&self, key: &str) {
        if key != self.key {
            debug!(key, "Ignoring invalidation for unrelated query");
            return;
        }

        let generation = self.next_generation();
        let query = self.clone();
        tokio::spawn(async move {
            if let Err(e) = query.fetch(generation).await {
                warn!(key = %query.key, error = %e, "Identity refetch failed; keeping stale data");
            }
        });
    }
}
