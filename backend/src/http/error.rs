//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub error: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            error: error.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Body, query or path the extractors could not decode
    Rejected(StatusCode, String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Rejected(status, msg) => (status, ApiError::new("INVALID_REQUEST", msg)),
            AppError::Repository(e) => repository_response(e),
        };

        (status, Json(error)).into_response()
    }
}

fn repository_response(e: RepositoryError) -> (StatusCode, ApiError) {
    let details = e.context().to_string();
    let (status, code) = if e.is_not_found() {
        (StatusCode::NOT_FOUND, "NOT_FOUND")
    } else if e.is_validation() {
        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
    } else if e.is_unavailable() {
        tracing::warn!("Record store unavailable: {}", e);
        (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
    } else {
        tracing::error!("Repository error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR")
    };
    (status, ApiError::new(code, e.message()).with_details(details))
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}
