//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Every error reaches the client as
//! `{"error": "<message>"}` and never carries internal details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vible_core::SignatureValidationError;
use vible_core::wire::ErrorResponse;

use crate::store::{BackendError, StoreError};

/// Application-level error type for the signature API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted signature failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] SignatureValidationError),

    /// Same fingerprint signed within the duplicate window.
    #[error("Duplicate signature detected")]
    Duplicate,

    /// The signature document could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] BackendError),

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::DuplicateSubmission => Self::Duplicate,
            StoreError::Persistence(e) => Self::Persistence(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Duplicate => "Duplicate signature detected".to_string(),
            Self::NotFound => "Not found".to_string(),
            // Don't expose internal error details to clients
            Self::Persistence(_) => "Failed to save signature".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Persistence(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
