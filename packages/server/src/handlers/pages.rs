//! HTML page flow: render, post, redirect with a flash notice.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use common::MediaCategory;
use common::models::SignUpOutcome;
use tracing::{instrument, warn};

use crate::controllers::media::MediaController;
use crate::controllers::profile::ProfileController;
use crate::controllers::session::{self, CurrentSession, bootstrap};
use crate::error::AppError;
use crate::extractors::json::AppForm;
use crate::extractors::session::SessionToken;
use crate::extractors::upload::UploadedFile;
use crate::handlers::media::parse_category;
use crate::models::auth::{CredentialsRequest, validate_credentials};
use crate::models::profile::ProfileFields;
use crate::state::AppState;
use crate::utils::cookies;
use crate::views;
use crate::views::dashboard::DashboardView;

pub const CONFIRM_EMAIL_NOTICE: &str = "Check your email to confirm your account";
pub const PROFILE_SAVED_NOTICE: &str = "Profile updated!";
pub const UPLOAD_DONE_NOTICE: &str = "Upload complete!";

fn redirect_with_notice(jar: CookieJar, to: &str, notice: &str) -> Response {
    (cookies::set_notice(jar, notice), Redirect::to(to)).into_response()
}

/// Resolve the session for a page request, or build the redirect to `/login`
/// that replaces the page. Only a token the service refused drops the cookie;
/// an outage keeps it so the next request can retry.
async fn require_session(
    state: &AppState,
    token: Option<common::AccessToken>,
    jar: CookieJar,
) -> Result<(CurrentSession, CookieJar), Response> {
    match bootstrap(&*state.identity, token).await {
        Ok(current) => Ok((current, jar)),
        Err(AppError::SessionMissing) => Err((jar, Redirect::to("/login")).into_response()),
        Err(e @ AppError::SessionInvalid) => {
            let jar = cookies::clear_session(jar, &state.config.session);
            Err(redirect_with_notice(jar, "/login", &e.user_message()))
        }
        Err(e) => {
            warn!("Session lookup failed, keeping cookie: {}", e.user_message());
            Err(redirect_with_notice(jar, "/login", &e.user_message()))
        }
    }
}

#[instrument(skip_all)]
pub async fn login_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = cookies::take_notice(jar);
    (jar, views::auth::login_page(notice.as_deref()))
}

#[instrument(skip_all)]
pub async fn signup_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = cookies::take_notice(jar);
    (jar, views::auth::signup_page(notice.as_deref()))
}

#[instrument(skip_all, fields(email = %form.email))]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<CredentialsRequest>,
) -> Response {
    let result = match validate_credentials(&form) {
        Ok(()) => session::sign_in(&*state.identity, form.email.trim(), &form.password).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(s) => {
            let jar = jar.add(cookies::session_cookie(&state.config.session, &s.access_token));
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(e) => redirect_with_notice(jar, "/login", &e.user_message()),
    }
}

#[instrument(skip_all, fields(email = %form.email))]
pub async fn signup_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<CredentialsRequest>,
) -> Response {
    let result = match validate_credentials(&form) {
        Ok(()) => session::sign_up(&*state.identity, form.email.trim(), &form.password).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(SignUpOutcome::SessionIssued(s)) => {
            let jar = jar.add(cookies::session_cookie(&state.config.session, &s.access_token));
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Ok(SignUpOutcome::ConfirmationRequired(_)) => {
            redirect_with_notice(jar, "/login", CONFIRM_EMAIL_NOTICE)
        }
        Err(e) => redirect_with_notice(jar, "/signup", &e.user_message()),
    }
}

#[instrument(skip_all)]
pub async fn logout_submit(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(token) = &token {
        session::sign_out(&*state.identity, token).await;
    }
    (
        cookies::clear_session(jar, &state.config.session),
        Redirect::to("/login"),
    )
}

#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> Response {
    let (current, jar) = match require_session(&state, token, jar).await {
        Ok(found) => found,
        Err(redirect) => return redirect,
    };

    let profile = ProfileController::from_state(&state).load(&current).await;

    // Rows written before track URLs were recorded have an empty list; show
    // whatever is in storage instead.
    let tracks = if profile.tracks.is_empty() {
        match MediaController::from_state(&state)
            .list_existing(&current, MediaCategory::Music)
            .await
        {
            Ok(items) => items.into_iter().map(|i| i.url).collect(),
            Err(e) => {
                warn!(user_id = %current.user_id(), "Could not list stored tracks: {}", e.user_message());
                Vec::new()
            }
        }
    } else {
        profile.tracks.clone()
    };

    let (jar, notice) = cookies::take_notice(jar);
    let page = views::dashboard::dashboard_page(&DashboardView {
        email: current.user.email.as_deref(),
        profile: &profile,
        tracks: &tracks,
        notice: notice.as_deref(),
    });
    (jar, page).into_response()
}

#[instrument(skip_all)]
pub async fn save_profile(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
    AppForm(fields): AppForm<ProfileFields>,
) -> Response {
    let (current, jar) = match require_session(&state, token, jar).await {
        Ok(found) => found,
        Err(redirect) => return redirect,
    };

    let result = match fields.normalized() {
        Ok(fields) => {
            ProfileController::from_state(&state)
                .save(&current, &fields)
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => redirect_with_notice(jar, "/dashboard#profile", PROFILE_SAVED_NOTICE),
        Err(e) => redirect_with_notice(
            jar,
            "/dashboard#profile",
            &format!("Error updating profile: {}", e.user_message()),
        ),
    }
}

#[instrument(skip_all, fields(category = %category))]
pub async fn upload_media(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
    Path(category): Path<String>,
    file: Result<UploadedFile, AppError>,
) -> Response {
    let (current, jar) = match require_session(&state, token, jar).await {
        Ok(found) => found,
        Err(redirect) => return redirect,
    };

    let result = match (parse_category(&category), file) {
        (Ok(category), Ok(UploadedFile(file))) => MediaController::from_state(&state)
            .upload(&current, file, category)
            .await
            .map(|_| category),
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    match result {
        Ok(category) => redirect_with_notice(
            jar,
            &format!("/dashboard#{}", section_for(category)),
            UPLOAD_DONE_NOTICE,
        ),
        Err(e) => redirect_with_notice(
            jar,
            "/dashboard",
            &format!("Upload error: {}", e.user_message()),
        ),
    }
}

fn section_for(category: MediaCategory) -> &'static str {
    match category {
        MediaCategory::Music => "music",
        MediaCategory::ProfilePicture | MediaCategory::Banner => "media",
    }
}

pub async fn profile_redirect() -> Redirect {
    Redirect::to("/dashboard#profile")
}

pub async fn upload_redirect() -> Redirect {
    Redirect::to("/dashboard#music")
}
