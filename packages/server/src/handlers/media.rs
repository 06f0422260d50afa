use axum::extract::{DefaultBodyLimit, Path, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use common::MediaCategory;
use tracing::instrument;

use crate::controllers::media::MediaController;
use crate::controllers::session::CurrentSession;
use crate::error::{AppError, ErrorBody};
use crate::extractors::upload::UploadedFile;
use crate::models::media::{MediaListResponse, UploadResponse};
use crate::state::AppState;

pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

pub(crate) fn parse_category(raw: &str) -> Result<MediaCategory, AppError> {
    raw.parse::<MediaCategory>().map_err(AppError::Validation)
}

/// Upload a file into one of the media categories.
#[utoipa::path(
    post,
    path = "/media/{category}",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload media",
    description = "Stores the `file` multipart field under `{user_id}/{category}/`. For \
        `profile-picture` and `banner` the public URL replaces the profile's slot; for `music` \
        it is appended to `tracks`. Earlier objects are never deleted.",
    params(("category" = MediaCategory, Path, description = "profile-picture, banner or music")),
    request_body(content_type = "multipart/form-data", description = "The `file` field"),
    responses(
        (status = 201, description = "Uploaded", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "No or expired session (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 413, description = "Body too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 502, description = "Storage or record store error (BACKEND_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, current, file), fields(user_id = %current.user_id()))]
pub async fn upload_media(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(category): Path<String>,
    UploadedFile(file): UploadedFile,
) -> Result<impl IntoResponse, AppError> {
    let category = parse_category(&category)?;
    let outcome = MediaController::from_state(&state)
        .upload(&current, file, category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            category,
            path: outcome.path,
            url: outcome.url,
            profile: outcome.profile,
        }),
    ))
}

/// List objects already stored in a category.
#[utoipa::path(
    get,
    path = "/media/{category}",
    tag = "Media",
    operation_id = "listMedia",
    summary = "List stored media",
    description = "Enumerates the caller's objects in the category, up to the configured limit, \
        in the order the store returns them.",
    params(("category" = MediaCategory, Path, description = "profile-picture, banner or music")),
    responses(
        (status = 200, description = "Stored objects", body = MediaListResponse),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "No or expired session (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 502, description = "Storage error (BACKEND_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, current), fields(user_id = %current.user_id()))]
pub async fn list_media(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(category): Path<String>,
) -> Result<Json<MediaListResponse>, AppError> {
    let category = parse_category(&category)?;
    let items = MediaController::from_state(&state)
        .list_existing(&current, category)
        .await?;

    Ok(Json(MediaListResponse {
        category,
        total: items.len(),
        items,
    }))
}
