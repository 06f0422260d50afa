use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use common::models::SignUpOutcome;
use tracing::instrument;

use crate::controllers::session::{self, CurrentSession};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::session::SessionToken;
use crate::models::auth::{
    CredentialsRequest, LoginResponse, SessionResponse, SignUpResponse, validate_credentials,
};
use crate::state::AppState;
use crate::utils::cookies;

/// Create an account with the identity service.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    operation_id = "signUp",
    summary = "Create an account",
    description = "Forwards the credentials to the identity service. When the service issues a \
        session straight away the token is returned and set as the session cookie; otherwise \
        `confirmation_required` is true and the user must confirm by email first.",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Rejected by the identity service (BACKEND_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload), fields(email = %payload.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_credentials(&payload)?;

    let outcome =
        session::sign_up(&*state.identity, payload.email.trim(), &payload.password).await?;

    let (jar, body) = match outcome {
        SignUpOutcome::SessionIssued(s) => (
            jar.add(cookies::session_cookie(&state.config.session, &s.access_token)),
            SignUpResponse {
                confirmation_required: false,
                access_token: Some(s.access_token.as_str().to_string()),
                user: s.user,
            },
        ),
        SignUpOutcome::ConfirmationRequired(user) => (
            jar,
            SignUpResponse {
                confirmation_required: true,
                access_token: None,
                user,
            },
        ),
    };

    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Sign in",
    description = "Exchanges the credentials for an access token, also set as the session cookie.",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Rejected by the identity service (BACKEND_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_credentials(&payload)?;

    let s = session::sign_in(&*state.identity, payload.email.trim(), &payload.password).await?;
    let jar = jar.add(cookies::session_cookie(&state.config.session, &s.access_token));

    Ok((
        jar,
        Json(LoginResponse {
            access_token: s.access_token.as_str().to_string(),
            expires_in: s.expires_in,
            user: s.user,
        }),
    ))
}

/// Revoke the session and drop the cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Sign out",
    description = "Asks the identity service to revoke the token. A failed revoke is logged, \
        not reported; the session cookie is cleared either way.",
    responses(
        (status = 204, description = "Signed out"),
    ),
    security(("session" = [])),
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(token) = &token {
        session::sign_out(&*state.identity, token).await;
    }
    (
        StatusCode::NO_CONTENT,
        cookies::clear_session(jar, &state.config.session),
    )
}

/// Resolve the current session.
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    operation_id = "getSession",
    summary = "Current user",
    responses(
        (status = 200, description = "Active session", body = SessionResponse),
        (status = 401, description = "No or expired session (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip_all, fields(user_id = %current.user_id()))]
pub async fn get_session(current: CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse { user: current.user })
}
