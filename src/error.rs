//! Error type shared by every handler.
//!
//! Each variant maps to one HTTP status and renders as `{ "error": <message> }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field was missing or empty (400).
    #[error("{0}")]
    BadRequest(String),

    /// Channel, message or user absent (404).
    #[error("{0}")]
    NotFound(String),

    /// Duplicate channel id or username (409).
    #[error("{0}")]
    Conflict(String),

    /// Ownership check failed (403).
    #[error("{0}")]
    Forbidden(String),

    /// The request body could not be read, e.g. over the size limit.
    #[error("{1}")]
    Rejected(StatusCode, String),

    /// The document could not be read or written (500).
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Rejected(status, _) => *status,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(err) => {
                tracing::error!(error = %err, "document storage failed");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
