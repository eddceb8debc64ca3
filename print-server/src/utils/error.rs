//! Request-level error handling
//!
//! Per-printer failures never surface here: the dispatcher captures them
//! into `DispatchResult.error`. Only request-shape violations become HTTP
//! errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Application error enum for the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request shape itself is invalid (400)
    #[error("malformed request: {0}")]
    RequestMalformed(String),

    /// Internal error (500)
    #[error("internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::RequestMalformed(msg) => {
                (StatusCode::BAD_REQUEST, format!("malformed request: {}", msg))
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });

        (status, body).into_response()
    }
}

/// Result alias for handlers
pub type AppResult<T> = Result<T, AppError>;
