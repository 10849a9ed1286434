//! Unified error handling for mail9

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// The first three variants are the pre-delivery pipeline failures: they
/// abort a send before any provider attempt, so no log row exists for them.
/// Delivery failure is not an error here at all; it travels through
/// `SendOutcome` and always gets logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No translations found for template \"{template}\" (tried: {tried})")]
    TranslationsNotFound { template: String, tried: String },

    #[error("Invalid template name: \"{0}\"")]
    InvalidTemplateName(String),

    #[error("Failed to render template \"{template}\": {reason}")]
    RenderFailure { template: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::TranslationsNotFound { .. } => {
                (StatusCode::BAD_REQUEST, "translations_not_found", self.to_string())
            }
            AppError::InvalidTemplateName(_) => {
                (StatusCode::BAD_REQUEST, "invalid_template_name", self.to_string())
            }
            AppError::RenderFailure { .. } => {
                (StatusCode::BAD_REQUEST, "render_failure", self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
