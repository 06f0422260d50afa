use axum::{Json, extract::State};
use common::ProfileRecord;
use tracing::instrument;

use crate::controllers::profile::ProfileController;
use crate::controllers::session::CurrentSession;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::profile::ProfileFields;
use crate::state::AppState;

/// Load the caller's profile, creating an empty one on first access.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    operation_id = "getProfile",
    summary = "Get own profile",
    description = "Returns the stored profile. A missing or unreadable row comes back with empty \
        fields; an empty row is created the first time.",
    responses(
        (status = 200, description = "Profile", body = ProfileRecord),
        (status = 401, description = "No or expired session (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip_all, fields(user_id = %current.user_id()))]
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Json<ProfileRecord> {
    Json(ProfileController::from_state(&state).load(&current).await)
}

/// Replace the caller's text fields.
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    operation_id = "updateProfile",
    summary = "Update own profile",
    description = "Writes all five text fields (last write wins). Media URLs are not touched.",
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Profile updated", body = ProfileRecord),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "No or expired session (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 502, description = "Record store error (BACKEND_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip_all, fields(user_id = %current.user_id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentSession,
    AppJson(fields): AppJson<ProfileFields>,
) -> Result<Json<ProfileRecord>, AppError> {
    let fields = fields.normalized()?;
    let saved = ProfileController::from_state(&state)
        .save(&current, &fields)
        .await?;
    Ok(Json(saved))
}
