//! Error types for songs-api
//!
//! Every failure leaves the service as `{"status_code": u16, "message": ...}`
//! where `message` is a plain string or a map of field name to messages.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use songs_common::InvalidSongId;
use thiserror::Error;
use tracing::error;

/// Client-visible message for every 500
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// Error message body: a sentence, or per-field violations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(BTreeMap<String, Vec<String>>),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Text(text) => f.write_str(text),
            ErrorMessage::Fields(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
                    .collect();
                f.write_str(&parts.join("; "))
            }
        }
    }
}

/// Wire shape of an error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: ErrorMessage,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload or parameter failed validation (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(ErrorMessage),

    /// Well-formed request for something that does not exist (404)
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Store or other infrastructure failure (500); detail is logged, not returned
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] songs_common::Error),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(ErrorMessage::Text(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::ItemNotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Unexpected(songs_common::Error::Database(err))
    }
}

impl From<InvalidSongId> for ApiError {
    fn from(err: InvalidSongId) -> Self {
        ApiError::invalid(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

/// Build a JSON error response with the given status
pub fn error_response(status: StatusCode, message: ErrorMessage) -> Response {
    let body = Json(ErrorResponse {
        status_code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::InvalidRequest(message) => message,
            ApiError::ItemNotFound(message) => ErrorMessage::Text(message),
            ApiError::Unexpected(err) => {
                error!("Unexpected error: {}", err);
                ErrorMessage::Text(UNEXPECTED_ERROR_MESSAGE.to_string())
            }
        };

        error_response(status, message)
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
