use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::options::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error response returned by read endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Unknown shortcode 'release-notes'")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub const STATUS_OK: &str = "OK";
pub const STATUS_INVALID_MESSAGE: &str = "invalid message";
pub const STATUS_INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";
pub const STATUS_STORAGE_ERROR: &str = "storage error";

/// Outcome of an admin update action, reported to the caller as `{status}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct StatusResponse {
    /// `OK`, `invalid message`, `insufficient permissions` or `storage error`.
    #[schema(example = "OK")]
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK.into(),
        }
    }
}

/// Failure of an admin update action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("insufficient permissions")]
    PermissionDenied,
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActionError {
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ActionError::PermissionDenied => {
                (StatusCode::FORBIDDEN, STATUS_INSUFFICIENT_PERMISSIONS)
            }
            ActionError::InvalidMessage(_) => (StatusCode::BAD_REQUEST, STATUS_INVALID_MESSAGE),
            ActionError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, STATUS_STORAGE_ERROR),
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        match &self {
            ActionError::Store(e) => tracing::error!("Update action failed: {e}"),
            other => tracing::warn!("Update action rejected: {other}"),
        }
        let (code, status) = self.status();
        (
            code,
            Json(StatusResponse {
                status: status.into(),
            }),
        )
            .into_response()
    }
}
