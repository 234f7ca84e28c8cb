//! Avatar randomizer and image-load fallback.

use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::notify::{NotificationKind, Notifier};

use super::draft::DraftStore;
use super::model::{AvatarTemplate, ProfileField};

/// Range the random avatar seed is drawn from.
pub const AVATAR_SEED_RANGE: RangeInclusive<u32> = 1..=1000;

pub const RANDOM_AVATAR_MESSAGE: &str = "Random profile picture generated!";
pub const AVATAR_LOAD_FAILED_MESSAGE: &str = "Failed to load avatar image. Showing default.";

/// Draw a seed uniformly from [`AVATAR_SEED_RANGE`].
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(AVATAR_SEED_RANGE)
}

/// Generates random avatar references for the draft.
pub struct AvatarRandomizer {
    draft: Arc<DraftStore>,
    template: AvatarTemplate,
    notifier: Arc<dyn Notifier>,
}

impl AvatarRandomizer {
    pub fn new(draft: Arc<DraftStore>, template: AvatarTemplate, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            draft,
            template,
            notifier,
        }
    }

    /// Replace the draft's avatar with a random one. Returns the new reference.
    pub fn randomize(&self) -> String {
        self.randomize_with(&mut rand::thread_rng())
    }

    /// Same as [`randomize`](Self::randomize) with an explicit random source.
    pub fn randomize_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let n = random_seed(rng);
        let url = self.template.random_url(n);
        debug!(seed = n, url = %url, "Random avatar generated");

        self.draft.set_field(ProfileField::ProfilePic, url.clone());
        self.notifier
            .notify(NotificationKind::Success, RANDOM_AVATAR_MESSAGE);
        url
    }

    /// The avatar at `failed_url` could not be fetched.
    ///
    /// Returns the reference to display instead. The draft keeps its value;
    /// only the rendered image falls back.
    pub fn load_failed(&self, failed_url: &str) -> String {
        warn!(url = %failed_url, "Avatar image failed to load");
        self.notifier
            .notify(NotificationKind::Error, AVATAR_LOAD_FAILED_MESSAGE);
        self.template.default_url()
    }
}
