use crate::{
    models::details::ValidationIssue,
    services::{collection_store::StoreError, details_service::DetailsError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field problems, only set for validation failures.
    pub issues: Option<Vec<ValidationIssue>>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            issues: None,
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.issues {
            Some(issues) => json!({
                "error": self.message,
                "status": self.status.as_u16(),
                "issues": issues,
            }),
            None => json!({
                "error": self.message,
                "status": self.status.as_u16()
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CollectionNotFound(_) => AppError::not_found(err.to_string()),
            StoreError::CollectionAlreadyExists(_) | StoreError::HandleTaken(_) => {
                AppError::new(StatusCode::CONFLICT, err.to_string())
            }
            StoreError::VersionConflict { .. } => {
                AppError::new(StatusCode::PRECONDITION_FAILED, err.to_string())
            }
            StoreError::Sqlx(_) => {
                tracing::error!("store failure: {}", err);
                AppError::internal(err.to_string())
            }
        }
    }
}

impl From<DetailsError> for AppError {
    fn from(err: DetailsError) -> Self {
        match err {
            DetailsError::InvalidJson(_) => AppError::bad_request(err.to_string()),
            DetailsError::Validation(validation) => Self {
                status: StatusCode::BAD_REQUEST,
                message: validation.to_string(),
                issues: Some(validation.issues),
            },
            DetailsError::PreconditionRequired => {
                AppError::new(StatusCode::PRECONDITION_REQUIRED, err.to_string())
            }
            DetailsError::Store(store) => store.into(),
        }
    }
}
