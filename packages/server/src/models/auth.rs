use common::User;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Email and password, as submitted by the login and signup forms.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "artist@example.com")]
    #[serde(default)]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    #[serde(default)]
    pub password: String,
}

/// Checks done before any remote call. Everything else is the identity
/// service's call.
pub fn validate_credentials(payload: &CredentialsRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Email must be a valid address".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful sign-in.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Bearer token. Also set as the session cookie.
    pub access_token: String,
    /// Token lifetime in seconds.
    #[schema(example = 3600)]
    pub expires_in: Option<u64>,
    pub user: User,
}

/// Result of sign-up.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SignUpResponse {
    /// True when the account must be confirmed by email before sign-in.
    pub confirmation_required: bool,
    /// Present when the service issued a session straight away.
    pub access_token: Option<String>,
    pub user: User,
}

/// The signed-in user behind the current session.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub user: User,
}
