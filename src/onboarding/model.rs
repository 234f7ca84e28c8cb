//! Profile draft, external identity, and avatar reference models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_AVATAR_TEMPLATE;
use crate::error::ControllerError;

/// Seed used for the well-known default avatar.
pub const DEFAULT_AVATAR_SEED: &str = "default";

/// The well-known default avatar reference.
pub const DEFAULT_AVATAR: &str = "https://api.dicebear.com/7.x/adventurer/svg?seed=default";

/// Formats avatar references from a URL template with a `{seed}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarTemplate {
    template: String,
}

impl AvatarTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Avatar URL for an arbitrary seed.
    pub fn url(&self, seed: &str) -> String {
        self.template.replace("{seed}", seed)
    }

    /// The default avatar reference (`seed=default`).
    pub fn default_url(&self) -> String {
        self.url(DEFAULT_AVATAR_SEED)
    }

    /// Avatar URL for a randomized seed `random-{n}`.
    pub fn random_url(&self, n: u32) -> String {
        self.url(&format!("random-{n}"))
    }
}

impl Default for AvatarTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_TEMPLATE)
    }
}

/// The in-progress profile the user is editing.
///
/// `profile_pic` is never empty: it falls back to the default avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub profile_pic: String,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self::empty(DEFAULT_AVATAR)
    }
}

impl ProfileDraft {
    /// An empty draft whose avatar is `default_avatar`.
    pub fn empty(default_avatar: &str) -> Self {
        Self {
            full_name: String::new(),
            bio: String::new(),
            native_language: String::new(),
            learning_language: String::new(),
            location: String::new(),
            profile_pic: default_avatar.to_string(),
        }
    }

    /// Build a draft from an identity snapshot, field by field.
    ///
    /// Missing or empty values become the empty string; a missing or empty
    /// avatar becomes `default_avatar`.
    pub fn from_identity(identity: &ExternalIdentity, default_avatar: &str) -> Self {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        Self {
            full_name: non_empty(&identity.full_name).unwrap_or_default().to_string(),
            bio: non_empty(&identity.bio).unwrap_or_default().to_string(),
            native_language: non_empty(&identity.native_language)
                .unwrap_or_default()
                .to_string(),
            learning_language: non_empty(&identity.learning_language)
                .unwrap_or_default()
                .to_string(),
            location: non_empty(&identity.location).unwrap_or_default().to_string(),
            profile_pic: non_empty(&identity.profile_pic)
                .unwrap_or(default_avatar)
                .to_string(),
        }
    }

    /// Read a single field.
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::Bio => &self.bio,
            ProfileField::NativeLanguage => &self.native_language,
            ProfileField::LearningLanguage => &self.learning_language,
            ProfileField::Location => &self.location,
            ProfileField::ProfilePic => &self.profile_pic,
        }
    }

    /// Replace a single field. Returns whether the value changed.
    pub fn set(&mut self, field: ProfileField, value: String) -> bool {
        let slot = match field {
            ProfileField::FullName => &mut self.full_name,
            ProfileField::Bio => &mut self.bio,
            ProfileField::NativeLanguage => &mut self.native_language,
            ProfileField::LearningLanguage => &mut self.learning_language,
            ProfileField::Location => &mut self.location,
            ProfileField::ProfilePic => &mut self.profile_pic,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

/// Snapshot of the authenticated user as reported by the session layer.
///
/// Every field may be missing; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalIdentity {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
}

/// Editable fields of a [`ProfileDraft`], named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FullName,
    Bio,
    NativeLanguage,
    LearningLanguage,
    Location,
    ProfilePic,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        Self::FullName,
        Self::Bio,
        Self::NativeLanguage,
        Self::LearningLanguage,
        Self::Location,
        Self::ProfilePic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Bio => "bio",
            Self::NativeLanguage => "nativeLanguage",
            Self::LearningLanguage => "learningLanguage",
            Self::Location => "location",
            Self::ProfilePic => "profilePic",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ControllerError::UnknownField(s.to_string()))
    }
}
