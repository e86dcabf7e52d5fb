use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DatabaseError;
use crate::domain::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::Validation(err) => {
                let status = match err {
                    ValidationError::TimeConflict => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.code(), err.to_string(), err.field())
            }
            AppError::Database(DatabaseError::NotFound) => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Resource not found".to_string(),
                None,
            ),
            AppError::Database(err) => {
                error!(error = %err, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "booking_failed",
                    "The booking could not be saved".to_string(),
                    None,
                )
            }
            AppError::Authentication(reason) => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                reason.clone(),
                None,
            ),
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, "not_found", message.clone(), None)
            }
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "too_many_requests",
                "Too many requests, try again later".to_string(),
                None,
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone(), None)
            }
            AppError::Internal(err) => {
                error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "field": field,
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
