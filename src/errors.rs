//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::{MSG_EMAIL_TAKEN, MSG_INTERNAL_ERROR};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body failed one or more schema rules
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Request body could not be decoded at all
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("{}", MSG_EMAIL_TAKEN)]
    DuplicateEmail,

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body: `{ "message": string | string[] }`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: ErrorMessage,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(self) -> ErrorMessage {
        match self {
            AppError::Validation(messages) => ErrorMessage::Many(messages),
            AppError::BadRequest(msg) => ErrorMessage::Single(msg),
            AppError::DuplicateEmail => ErrorMessage::Single(MSG_EMAIL_TAKEN.to_string()),

            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                ErrorMessage::Single(MSG_INTERNAL_ERROR.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorMessage::Single(MSG_INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppError::Validation(messages.into_iter().map(Into::into).collect())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
