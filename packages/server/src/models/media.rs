use common::{MediaCategory, ProfileRecord};
use serde::Serialize;

/// Result of one upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub category: MediaCategory,
    /// Object path inside the media bucket.
    #[schema(example = "7c0b3f5e-2d7a-4c1e-9a55-3f0c2e9b1d42/music/1718000000000-demo.mp3")]
    pub path: String,
    /// Public URL of the uploaded object.
    pub url: String,
    /// Profile row after the URL was recorded.
    pub profile: ProfileRecord,
}

/// One stored object of a category.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaItem {
    #[schema(example = "1718000000000-demo.mp3")]
    pub name: String,
    pub path: String,
    pub url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaListResponse {
    pub category: MediaCategory,
    pub items: Vec<MediaItem>,
    pub total: usize,
}
