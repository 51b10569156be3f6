//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use civic_checkout_core::AttributeKey;

use crate::db::RepositoryError;
use crate::services::notice::notice;
use crate::services::{FieldError, FieldErrorKind, SubmissionError};

/// Application-level error type for the checkout service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted fields failed validation.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Attribute store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request conflicts with data that is already stored.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(errors) => Self::Validation(errors),
            SubmissionError::AlreadyRecorded(order_id) => {
                Self::Conflict(format!("identity numbers already recorded for order {order_id}"))
            }
            SubmissionError::Storage(err) => Self::Storage(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// One rejected field in a validation response.
#[derive(Debug, Serialize)]
pub struct FieldErrorBody {
    pub field: AttributeKey,
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorBody>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => ErrorBody {
                error: "Validation failed".to_string(),
                fields: errors
                    .iter()
                    .map(|e| FieldErrorBody {
                        field: e.field,
                        kind: e.kind,
                        message: notice(e),
                    })
                    .collect(),
            },
            Self::Storage(_) | Self::Session(_) => ErrorBody {
                error: "Internal server error".to_string(),
                fields: Vec::new(),
            },
            other => ErrorBody {
                error: other.to_string(),
                fields: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
