use thiserror::Error;

/// Failure of a call to the hosted service.
///
/// Callers do not branch on the cause; the `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The service answered with an error. `message` is its own wording.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response from backend: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// HTTP status reported by the service, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(feature = "supabase")]
impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
