//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across the adapters, the relay service and the HTTP layer.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx)
//!    - [`Validation`](AppError::Validation) → 400 Bad Request
//!    - [`PayloadTooLarge`](AppError::PayloadTooLarge) → 413 Payload Too Large
//!
//! 2. **Server Errors** (5xx)
//!    - [`Backend`](AppError::Backend) → the hosted assistant API failed
//!    - [`Extraction`](AppError::Extraction) → the API answered without an assistant reply
//!    - [`Timeout`](AppError::Timeout) → a run did not complete within the polling bound
//!    - [`Cancelled`](AppError::Cancelled) → the caller went away mid-request
//!    - [`Config`](AppError::Config) / [`Internal`](AppError::Internal)
//!
//! The kind is kept intact up to the presentation layer. Handlers then decide what
//! the client sees (see [`AppError::into_boundary_response`]); the full error is
//! only ever written to the logs.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

/// Body returned by `POST /api/chat` on any server-side failure.
pub const CHAT_FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// Body returned by `POST /api/upload` on any server-side failure.
pub const UPLOAD_FAILURE_MESSAGE: &str = "An error occurred while uploading the file.";

/// Body returned by `POST /api/upload` when the `file` part is missing.
pub const NO_FILE_MESSAGE: &str = "No file uploaded.";

/// Body returned by `POST /api/chat` when the request body is not `{ "message": "..." }`.
pub const INVALID_CHAT_MESSAGE: &str = "Invalid chat request.";

/// Body returned by `POST /api/upload` when the body exceeds the upload limit.
pub const UPLOAD_TOO_LARGE_MESSAGE: &str = "File too large.";

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed client input.
    ///
    /// **HTTP Status**: 400 Bad Request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body larger than the configured limit.
    ///
    /// **HTTP Status**: 413 Payload Too Large
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The hosted assistant API call failed (network, non-2xx, bad payload,
    /// or a run that ended in a non-completed terminal state).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The thread held no assistant-authored text to return.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Polling bound exhausted before the run completed.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The request was cancelled before it finished.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Config(_)
            | AppError::Backend(_)
            | AppError::Extraction(_)
            | AppError::Timeout(_)
            | AppError::Cancelled(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short stable name of the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Validation(_) => "Validation",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Backend(_) => "Backend",
            AppError::Extraction(_) => "Extraction",
            AppError::Timeout(_) => "Timeout",
            AppError::Cancelled(_) => "Cancelled",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For server-side errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::PayloadTooLarge(msg) => msg.clone(),
            _ => "An internal error occurred".to_string(),
        }
    }

    /// Render this error for an endpoint with a fixed server-failure message.
    ///
    /// Validation errors keep their own message and 400 status; every other
    /// kind becomes a 500 carrying `server_message`.
    pub fn into_boundary_response(self, server_message: &'static str) -> Response {
        self.log();
        let status = self.status_code();
        let message = if status.is_client_error() {
            self.user_message()
        } else {
            server_message.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }

    fn log(&self) {
        if self.status_code().is_client_error() {
            tracing::debug!(kind = self.kind(), "Client error: {}", self);
        } else {
            tracing::error!(kind = self.kind(), "Server error: {}", self);
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = Json(json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `std::io::Error` to `AppError`.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

/// Convert `serde_json::Error` to `AppError`.
///
/// JSON only crosses this crate boundary when decoding API payloads.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Backend(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PayloadTooLarge("x".into()).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AppError::Backend("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Timeout("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_boundary_response_hides_detail() {
        let response = AppError::Backend("upstream said 503 for thread_abc".into())
            .into_boundary_response(CHAT_FAILURE_MESSAGE);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": CHAT_FAILURE_MESSAGE }));
    }

    #[tokio::test]
    async fn test_boundary_response_keeps_validation_message() {
        let response = AppError::Validation(NO_FILE_MESSAGE.into())
            .into_boundary_response(UPLOAD_FAILURE_MESSAGE);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "No file uploaded." }));
    }
}
