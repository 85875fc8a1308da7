use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ConfigError;

/// Failures of the passcode/token backend calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("{message}")]
    InvalidPasscode { message: String },

    #[error("{message}")]
    Server {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("Token backend unreachable: {0}")]
    Transport(String),

    #[error("No verified passcode for this session")]
    NotSignedIn,
}

impl AuthError {
    /// Server-supplied error code, when the backend sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            AuthError::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match &self {
            AppError::Auth(AuthError::InvalidPasscode { message }) => {
                (StatusCode::UNAUTHORIZED, message.clone(), None)
            }
            AppError::Auth(AuthError::NotSignedIn) => {
                (StatusCode::UNAUTHORIZED, self.to_string(), None)
            }
            AppError::Auth(AuthError::Server { message, code, .. }) => {
                (StatusCode::BAD_GATEWAY, message.clone(), code.clone())
            }
            AppError::Auth(AuthError::Transport(_)) => {
                (StatusCode::BAD_GATEWAY, self.to_string(), None)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Config(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), None)
            }
        };

        let mut error = json!({ "message": message });
        if let Some(code) = code {
            error["code"] = json!(code);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
