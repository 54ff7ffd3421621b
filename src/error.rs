use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::validation::ValidationErrors;

/// Application error type that can be returned from handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthenticated")]
    Unauthorized,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    // Request errors
    #[error("Validation error: {}", .0.summary())]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // File storage errors
    #[error("Upload error: {0}")]
    Upload(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(String),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details, errors) = match self {
            // 401 Unauthorized
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token", None, None),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired", None, None),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthenticated", None, None),

            // 404 Not Found
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "Not found", Some(resource), None)
            }

            // 422 Unprocessable Entity
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error",
                Some(errors.summary()),
                Some(errors),
            ),

            // 400 Bad Request
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg), None),

            // 500 Internal Server Error
            AppError::Upload(msg) => {
                tracing::error!("Upload error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File upload failed",
                    None,
                    None,
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error", None, None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
            errors,
        });

        (status, body).into_response()
    }
}

// Convenient conversions from common error types

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(_) => AppError::NotFound("Resource".to_string()),
            sea_orm::DbErr::RecordNotUpdated => AppError::NotFound("Resource".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "The title field is required.");

        let cases = [
            (AppError::Validation(errors), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::NotFound("Project".into()), StatusCode::NOT_FOUND),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AppError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Upload("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err: AppError = sea_orm::DbErr::RecordNotFound("projects".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
