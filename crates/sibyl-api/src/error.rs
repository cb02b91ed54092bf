//! API error types and JSON error response formatting.
//!
//! ApiError provides the uniform `{"status": "error", "message": ...}` body
//! across all endpoints, mapping internal errors to HTTP status codes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sibyl_core::error::SibylError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always the literal string "error".
    pub status: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - invalid input or the index is not built yet.
    BadRequest(String),
    /// 500 Internal Server Error - an operational stage failed.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            status: "error".to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SibylError> for ApiError {
    fn from(err: SibylError) -> Self {
        // Client-facing failures carry their inner message verbatim;
        // operational errors keep the full display form.
        match err {
            SibylError::Validation(msg) | SibylError::NotReady(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Body extraction failures (bad syntax, wrong shape, missing JSON
        // content type) get the same envelope as handler validation.
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
