use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use common::AccessToken;

use crate::controllers::session::{CurrentSession, bootstrap};
use crate::error::AppError;
use crate::state::AppState;

/// Access token from the session cookie, else from `Authorization: Bearer`.
pub fn request_token(headers: &HeaderMap, cookie_name: &str) -> Option<AccessToken> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    from_cookie
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .map(AccessToken::new)
}

/// The raw request token, unchecked. Never rejects.
pub struct SessionToken(pub Option<AccessToken>);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(request_token(
            &parts.headers,
            &state.config.session.cookie_name,
        )))
    }
}

/// Requires a live session. Rejects with `SESSION_MISSING` or `SESSION_INVALID`.
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers, &state.config.session.cookie_name);
        bootstrap(&*state.identity, token).await
    }
}
