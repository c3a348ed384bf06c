use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::grading::GradingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Grading service unreachable: {0}")]
    Network(String),

    #[error("Unexpected grading response: {0}")]
    ResponseFormat(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(ext),
            ExtractionError::Failed(reason) => AppError::ExtractionFailed(reason),
        }
    }
}

impl From<GradingError> for AppError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::Config(msg) => AppError::Config(msg),
            GradingError::Network(msg) => AppError::Network(msg),
            GradingError::ResponseFormat(msg) => AppError::ResponseFormat(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(ext) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file format: {ext}"),
            ),
            AppError::ExtractionFailed(msg) => {
                tracing::warn!("Extraction failed: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    format!("Text extraction failed: {msg}"),
                )
            }
            AppError::DuplicateSubmission(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_SUBMISSION", msg.clone())
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "The grading service is not configured".to_string(),
                )
            }
            AppError::Network(msg) => {
                tracing::error!("Grading network error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "NETWORK_ERROR",
                    format!("Grading service request failed: {msg}"),
                )
            }
            AppError::ResponseFormat(msg) => {
                tracing::error!("Grading response format error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RESPONSE_FORMAT_ERROR",
                    format!("Grading service returned an unexpected response: {msg}"),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
