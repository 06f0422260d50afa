use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::BackendError;
use serde::Serialize;

/// Structured error response returned by all API endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `SESSION_MISSING`,
    /// `SESSION_INVALID`, `NOT_FOUND`, `PAYLOAD_TOO_LARGE`, `BACKEND_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "BACKEND_ERROR")]
    pub code: &'static str,
    /// Human-readable error description. For `BACKEND_ERROR` this is the
    /// hosted service's own message.
    #[schema(example = "Invalid login credentials")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    SessionMissing,
    SessionInvalid,
    NotFound(String),
    PayloadTooLarge(String),
    /// A remote call failed. The message is shown to the user as-is.
    Backend(String),
    Internal(String),
}

impl AppError {
    /// Text suitable for a flash notice on the HTML pages.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Backend(msg) => msg.clone(),
            AppError::SessionMissing => "Please sign in".into(),
            AppError::SessionInvalid => "Your session has expired, please sign in again".into(),
            AppError::Internal(_) => "An unexpected error occurred".into(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::SessionMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "SESSION_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::SessionInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "SESSION_INVALID",
                    message: "Invalid or expired session".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "PAYLOAD_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::Backend(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "BACKEND_ERROR",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err.to_string())
    }
}
