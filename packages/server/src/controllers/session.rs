use common::models::{SignUpOutcome, User};
use common::{AccessToken, BackendError, IdentityService, Session};
use tracing::{info, warn};

use crate::error::AppError;

/// An authenticated request's view of the identity service's session.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: AccessToken,
    pub user: User,
}

impl CurrentSession {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Resolve the session behind a request token.
///
/// No token is `SessionMissing`; a token the service refuses is
/// `SessionInvalid`. Anything else (network, 5xx) is a backend error.
pub async fn bootstrap(
    identity: &dyn IdentityService,
    token: Option<AccessToken>,
) -> Result<CurrentSession, AppError> {
    let token = token.ok_or(AppError::SessionMissing)?;

    match identity.current_user(&token).await {
        Ok(user) => Ok(CurrentSession { token, user }),
        Err(BackendError::Service { status, .. }) if (400..500).contains(&status) => {
            Err(AppError::SessionInvalid)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn sign_up(
    identity: &dyn IdentityService,
    email: &str,
    password: &str,
) -> Result<SignUpOutcome, AppError> {
    let outcome = identity.sign_up(email, password).await?;
    match &outcome {
        SignUpOutcome::SessionIssued(session) => {
            info!(user_id = %session.user.id, "Account created");
        }
        SignUpOutcome::ConfirmationRequired(user) => {
            info!(user_id = %user.id, "Account created, awaiting email confirmation");
        }
    }
    Ok(outcome)
}

pub async fn sign_in(
    identity: &dyn IdentityService,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let session = identity.sign_in(email, password).await?;
    info!(user_id = %session.user.id, "Signed in");
    Ok(session)
}

/// Revoke the token remotely. The caller drops its cookie regardless, so a
/// failed revoke is only logged.
pub async fn sign_out(identity: &dyn IdentityService, token: &AccessToken) {
    if let Err(e) = identity.sign_out(token).await {
        warn!("Remote sign-out failed: {e}");
    }
}
