//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::checker::CheckError;
use crate::collector::CollectorError;
use crate::session::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
    /// Message is meant for the user and is returned as-is.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "BUSY", detail.clone()),
            ApiError::AnalysisFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ANALYSIS_FAILED",
                message.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<CheckError> for ApiError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::NoSymptoms => ApiError::BadRequest(err.to_string()),
            CheckError::InFlight => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<CollectorError> for ApiError {
    fn from(err: CollectorError) -> Self {
        match err {
            CollectorError::BlankName => ApiError::BadRequest(err.to_string()),
            CollectorError::Busy => ApiError::Conflict(err.to_string()),
        }
    }
}
