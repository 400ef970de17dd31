//! Error handling for the libris HTTP layer.
//!
//! Every failure a handler can produce funnels through one `IntoResponse`
//! implementation, so the error-to-JSON translation lives in a single place
//! instead of being repeated per route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application error types that map to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body failed schema validation. Carries one message per
    /// violated constraint; answers 400 with the full list.
    #[error("validation failed: {errors:?}")]
    Validation { errors: Vec<String> },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error from a list of violation messages.
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, body) = match self {
            AppError::Validation { errors } => {
                (StatusCode::BAD_REQUEST, json!({ "error": errors }))
            }
            AppError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                json!({ "error": { "message": message, "status": 404 } }),
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({ "error": { "message": message, "status": 409 } }),
            ),
            AppError::Internal(err) => {
                // In production the internal details stay in the logs.
                let message = if cfg!(debug_assertions) {
                    err.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };

                tracing::error!(error_id = %error_id, error = %err, "unhandled error");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": { "message": message, "status": 500 } }),
                )
            }
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            "request error"
        );

        (status, Json(body)).into_response()
    }
}
