use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-scoped failures returned by the handlers.
///
/// None of these are fatal to the process and none leave partial state
/// behind: handlers only touch the store after every check has passed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or inconsistent input.
    #[error("{0}")]
    Validation(String),

    /// No member is registered under the given email.
    #[error("Member not found")]
    NotFound,

    /// Credentials did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// The public message is generic; the detail only goes to the log.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { message, detail } = &self {
            error!("{}: {}", message, detail);
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
