use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Bearer token issued by the identity service for one signed-in user.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in span fields through `Session`; keep them out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The part of the identity service's user object the portal reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    /// Stable user identifier (UUID). Keys the profile row and the storage namespace.
    #[schema(example = "7c0b3f5e-2d7a-4c1e-9a55-3f0c2e9b1d42")]
    pub id: String,
    #[serde(default)]
    #[schema(example = "artist@example.com")]
    pub email: Option<String>,
}

/// A signed-in session as issued by sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: AccessToken,
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds, when the service reports one.
    pub expires_in: Option<u64>,
    pub user: User,
}

/// Result of a sign-up call.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The account is usable immediately.
    SessionIssued(Session),
    /// The account exists but the email address must be confirmed before sign-in.
    ConfirmationRequired(User),
}

/// Upload category. Decides the storage sub-directory and how the URL is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MediaCategory {
    ProfilePicture,
    Banner,
    Music,
}

/// How an uploaded URL lands in the profile record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    /// Replaces a single field.
    Single,
    /// Appended to an ordered list.
    List,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 3] = [
        MediaCategory::ProfilePicture,
        MediaCategory::Banner,
        MediaCategory::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfilePicture => "profile-picture",
            Self::Banner => "banner",
            Self::Music => "music",
        }
    }

    pub fn slot(&self) -> MediaSlot {
        match self {
            Self::ProfilePicture | Self::Banner => MediaSlot::Single,
            Self::Music => MediaSlot::List,
        }
    }

    /// Advisory `accept` hint for the file picker.
    pub fn accept(&self) -> &'static str {
        match self {
            Self::ProfilePicture | Self::Banner => "image/*",
            Self::Music => "audio/*",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown media category '{s}'"))
    }
}

/// One row of the profile table.
///
/// Text columns are nullable on the service side; `null` reads back as an
/// empty string so the form always has something to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileRecord {
    /// Owning user's identifier. Primary key.
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(example = "night_shift")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: String,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(example = "https://open.spotify.com/artist/0abc")]
    pub spotify: String,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(example = "https://instagram.com/night_shift")]
    pub instagram: String,
    /// Free-form release schedule text.
    #[serde(default, deserialize_with = "nullable")]
    pub release_notes: String,
    /// Public URL of the current profile picture, or empty.
    #[serde(default, deserialize_with = "nullable")]
    pub profile_pic: String,
    /// Public URL of the current banner, or empty.
    #[serde(default, deserialize_with = "nullable")]
    pub banner: String,
    /// Public URLs of uploaded tracks in upload order.
    #[serde(default, deserialize_with = "nullable")]
    pub tracks: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: String::new(),
            bio: String::new(),
            spotify: String::new(),
            instagram: String::new(),
            release_notes: String::new(),
            profile_pic: String::new(),
            banner: String::new(),
            tracks: Vec::new(),
            updated_at: None,
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Options for a single object upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Replace an existing object at the same path instead of failing.
    pub upsert: bool,
    /// Advisory MIME type stored with the object.
    pub content_type: Option<String>,
}

/// Options for enumerating objects under a prefix.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    /// Upper bound on returned entries. Anything beyond it is silently dropped.
    pub limit: usize,
}

/// An object as reported by a storage listing. `name` is relative to the listed prefix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    /// `None` for folder placeholders.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
