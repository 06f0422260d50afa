//! Storage path derivation for uploaded media.
//!
//! Objects live at `{user_id}/{category}/{suffix}-{file_name}`. The suffix is
//! generated per upload so two files with the same name never collide.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::MediaCategory;

/// Result of validating an uploaded file name.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `..` or `.`.
    PathTraversal,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, NUL, etc.).
    ControlCharacter,
    TooLong,
}

const MAX_FILENAME_LEN: usize = 255;

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::TooLong => "Invalid filename: at most 255 characters are allowed",
        }
    }
}

/// Validates the name a browser sent for an uploaded file. Returns it trimmed.
pub fn validate_file_name(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed == ".." || trimmed == "." {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    if trimmed.chars().count() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }

    Ok(trimmed)
}

/// Reduce a validated name to characters that need no URL encoding.
pub fn sanitize_segment(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Hex digits of randomness appended to a timestamp suffix.
const TIMESTAMP_TAIL_LEN: usize = 8;

/// How the per-upload disambiguator is generated.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadSuffix {
    /// Milliseconds since the Unix epoch, then a short random tail so two
    /// uploads in the same millisecond still differ.
    #[default]
    Timestamp,
    /// UUIDv7 in simple form; sorts by creation time like the timestamp does.
    Uuid,
}

impl UploadSuffix {
    pub fn generate(&self) -> String {
        match self {
            Self::Timestamp => {
                let tail = Uuid::new_v4().simple().to_string();
                format!("{}-{}", Utc::now().timestamp_millis(), &tail[..TIMESTAMP_TAIL_LEN])
            }
            Self::Uuid => Uuid::now_v7().simple().to_string(),
        }
    }
}

/// Directory holding every object of one category for one user, with trailing slash.
pub fn category_prefix(user_id: &str, category: MediaCategory) -> String {
    format!("{user_id}/{}/", category.as_str())
}

/// Full object path for one upload.
pub fn object_path(user_id: &str, category: MediaCategory, suffix: &str, file_name: &str) -> String {
    format!(
        "{}{suffix}-{}",
        category_prefix(user_id, category),
        sanitize_segment(file_name)
    )
}
