use common::models::{ListOptions, MediaSlot, UploadOptions};
use common::storage_path::{UploadSuffix, category_prefix, object_path, validate_file_name};
use common::{BlobStore, MediaCategory, ProfileRecord};
use serde_json::{Map, Value};
use tracing::info;

use super::profile::ProfileController;
use super::session::CurrentSession;
use crate::error::AppError;
use crate::models::media::MediaItem;
use crate::state::AppState;

/// A file as received from the browser.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    /// Type sent by the browser. Used when the extension gives no hint.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// An uploaded object and the profile row that now points at it.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub path: String,
    pub url: String,
    pub profile: ProfileRecord,
}

/// Uploads media and records the resulting public URLs on the profile.
pub struct MediaController<'a> {
    blobs: &'a dyn BlobStore,
    profiles: ProfileController<'a>,
    bucket: &'a str,
    suffix: UploadSuffix,
    list_limit: usize,
}

/// Profile column holding a single-slot category's URL.
fn slot_column(category: MediaCategory) -> Option<&'static str> {
    match category {
        MediaCategory::ProfilePicture => Some("profile_pic"),
        MediaCategory::Banner => Some("banner"),
        MediaCategory::Music => None,
    }
}

impl<'a> MediaController<'a> {
    pub fn new(
        blobs: &'a dyn BlobStore,
        profiles: ProfileController<'a>,
        bucket: &'a str,
        suffix: UploadSuffix,
        list_limit: usize,
    ) -> Self {
        Self {
            blobs,
            profiles,
            bucket,
            suffix,
            list_limit,
        }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(
            &*state.blobs,
            ProfileController::from_state(state),
            &state.config.backend.media_bucket,
            state.config.upload.suffix,
            state.config.upload.list_limit,
        )
    }

    /// Route an upload to the single-slot or append flow by category.
    pub async fn upload(
        &self,
        session: &CurrentSession,
        file: MediaUpload,
        category: MediaCategory,
    ) -> Result<UploadOutcome, AppError> {
        match category.slot() {
            MediaSlot::Single => self.upload_single(session, file, category).await,
            MediaSlot::List => self.upload_and_append(session, file).await,
        }
    }

    /// Upload a profile picture or banner and replace the slot's URL.
    ///
    /// The previous object is not deleted.
    pub async fn upload_single(
        &self,
        session: &CurrentSession,
        file: MediaUpload,
        category: MediaCategory,
    ) -> Result<UploadOutcome, AppError> {
        let column = slot_column(category).ok_or_else(|| {
            AppError::Validation(format!("Category '{category}' is not a single-file slot"))
        })?;

        let (path, url) = self.put(session, file, category).await?;

        let mut changes = Map::new();
        changes.insert(column.into(), Value::String(url.clone()));
        let profile = self.profiles.write(session, changes).await?;

        Ok(UploadOutcome { path, url, profile })
    }

    /// Upload a track and append its URL to the profile's track list.
    ///
    /// The list is read, extended and written back; two overlapping appends
    /// can drop one of the URLs.
    pub async fn upload_and_append(
        &self,
        session: &CurrentSession,
        file: MediaUpload,
    ) -> Result<UploadOutcome, AppError> {
        let (path, url) = self.put(session, file, MediaCategory::Music).await?;

        let mut tracks = self
            .profiles
            .fetch(session)
            .await?
            .map(|p| p.tracks)
            .unwrap_or_default();
        tracks.push(url.clone());

        let mut changes = Map::new();
        changes.insert("tracks".into(), Value::from(tracks));
        let profile = self.profiles.write(session, changes).await?;

        Ok(UploadOutcome { path, url, profile })
    }

    /// Objects already stored under the user's category directory, with
    /// their public URLs, in the store's order.
    pub async fn list_existing(
        &self,
        session: &CurrentSession,
        category: MediaCategory,
    ) -> Result<Vec<MediaItem>, AppError> {
        let prefix = category_prefix(session.user_id(), category);
        let entries = self
            .blobs
            .list(
                &session.token,
                self.bucket,
                &prefix,
                &ListOptions {
                    limit: self.list_limit,
                },
            )
            .await?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let path = format!("{prefix}{}", entry.name);
                MediaItem {
                    url: self.blobs.public_url(self.bucket, &path),
                    name: entry.name,
                    path,
                }
            })
            .collect())
    }

    async fn put(
        &self,
        session: &CurrentSession,
        file: MediaUpload,
        category: MediaCategory,
    ) -> Result<(String, String), AppError> {
        let file_name = validate_file_name(&file.file_name)
            .map_err(|e| AppError::Validation(e.message().into()))?;
        let path = object_path(
            session.user_id(),
            category,
            &self.suffix.generate(),
            file_name,
        );
        let size = file.data.len();
        let content_type = mime_guess::from_path(file_name)
            .first()
            .map(|m| m.essence_str().to_string())
            .or(file.content_type);

        self.blobs
            .upload(
                &session.token,
                self.bucket,
                &path,
                file.data,
                &UploadOptions {
                    upsert: false,
                    content_type,
                },
            )
            .await?;

        info!(user_id = %session.user_id(), %category, %path, size, "Media uploaded");
        let url = self.blobs.public_url(self.bucket, &path);
        Ok((path, url))
    }
}
