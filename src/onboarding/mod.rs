//! Onboarding controller — the "complete your profile" flow.
//!
//! The controller owns a profile draft seeded from the signed-in user, lets
//! the user edit it and randomize an avatar, and submits it to the backend.
//! Success invalidates the cached identity so the onboarded profile is
//! refetched; failure surfaces the server's message to the user.

pub mod avatar;
pub mod cache;
pub mod controller;
pub mod draft;
pub mod identity;
pub mod languages;
pub mod model;
pub mod state;
pub mod submission;

pub use avatar::AvatarRandomizer;
pub use cache::{IdentityQuery, QueryCache};
pub use controller::{OnboardingController, OnboardingStatus};
pub use draft::DraftStore;
pub use identity::IdentitySynchronizer;
pub use languages::LANGUAGES;
pub use model::{AvatarTemplate, DEFAULT_AVATAR, ExternalIdentity, ProfileDraft, ProfileField};
pub use state::{SubmissionState, SubmissionStatus};
pub use submission::SubmissionOrchestrator;
