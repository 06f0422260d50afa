use serde::Deserialize;

use crate::error::AppError;

const MAX_USERNAME: usize = 64;
const MAX_LINK: usize = 512;
const MAX_TEXT: usize = 4000;

/// The editable part of a profile. Saved as one unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ProfileFields {
    #[schema(example = "night_shift")]
    pub username: String,
    pub bio: String,
    #[schema(example = "https://open.spotify.com/artist/0abc")]
    pub spotify: String,
    #[schema(example = "https://instagram.com/night_shift")]
    pub instagram: String,
    /// Free-form release schedule.
    pub release_notes: String,
}

impl ProfileFields {
    /// Trim every field and check lengths and link shape.
    pub fn normalized(self) -> Result<Self, AppError> {
        let fields = Self {
            username: self.username.trim().to_string(),
            bio: self.bio.trim().to_string(),
            spotify: self.spotify.trim().to_string(),
            instagram: self.instagram.trim().to_string(),
            release_notes: self.release_notes.trim().to_string(),
        };

        check_len("Username", &fields.username, MAX_USERNAME)?;
        check_len("Bio", &fields.bio, MAX_TEXT)?;
        check_len("Release notes", &fields.release_notes, MAX_TEXT)?;
        check_link("Spotify link", &fields.spotify)?;
        check_link("Instagram link", &fields.instagram)?;

        Ok(fields)
    }
}

fn check_len(name: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_link(name: &str, value: &str) -> Result<(), AppError> {
    check_len(name, value, MAX_LINK)?;
    if !value.is_empty() && !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(AppError::Validation(format!(
            "{name} must start with http:// or https://"
        )));
    }
    Ok(())
}
