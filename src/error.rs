//! Error types for the Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
///
/// All operation failures are resolved into one of these variants inside the
/// service layer; handlers never see a half-formed error. The variant, not
/// the message, decides the HTTP status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// The book name is missing, empty, or otherwise unusable.
    #[error("{0}")]
    EmptyName(String),

    /// `readPage` is greater than `pageCount`.
    #[error("{0}")]
    ReadPageExceedsPageCount(String),

    /// A recognized field carried a value of the wrong type.
    /// Surfaced to clients as a generic failure.
    #[error("{0}")]
    TypeMismatch(String),

    #[error("{0}")]
    NotFound(String),

    /// The filter was invoked with zero query terms. This is a caller bug,
    /// not a user input error.
    #[error("filter invoked with an empty query-term mapping")]
    EmptyQuery,

    /// A record vanished between lookup and write-back.
    #[error("{0}")]
    UpdateFailed(String),

    #[error("{0}")]
    Internal(String),
}

/// Failure response body: `{"status":"fail","message":...}`
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::EmptyName(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ReadPageExceedsPageCount(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::TypeMismatch(msg) => {
                tracing::error!("Type mismatch in payload: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::EmptyQuery => {
                tracing::error!("Filter called with an empty query-term mapping");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::UpdateFailed(msg) => {
                tracing::error!("Update write-back failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            status: "fail".to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
