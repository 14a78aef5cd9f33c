//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; the client only ever sees a JSON
//! body of the form `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pantry_core::TemporalError;
use serde::Serialize;
use thiserror::Error;

use crate::models::PatchError;
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body fields are malformed or out of range.
    #[error("{0}")]
    Validation(String),

    /// Query parameter or body syntax could not be parsed.
    #[error("{0}")]
    InvalidInput(String),

    /// Record id in the path is not a valid id.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Well-formed id with no matching record.
    #[error("{0}")]
    NotFound(String),

    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidInput(_) | Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PatchError> for AppError {
    fn from(err: PatchError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TemporalError> for AppError {
    fn from(err: TemporalError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (self.status(), Json(ErrorBody { detail })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
