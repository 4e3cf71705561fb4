// ABOUTME: API error taxonomy and its JSON response envelope
// ABOUTME: Internal failure details are logged under a request id, never returned to clients

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use taskdeck_core::InvalidEnumValue;
use taskdeck_storage::{PaginationError, StorageError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::NotFound(what),
            StorageError::DuplicateTagName(name) => {
                ApiError::Conflict(format!("tag '{name}' already exists"))
            }
            other => ApiError::Storage(other),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<InvalidEnumValue> for ApiError {
    fn from(err: InvalidEnumValue) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
    request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.status_and_code();

        // 5xx details stay in the logs; clients see a generic message
        let message = match &self {
            ApiError::Storage(e) => {
                error!(%request_id, "Storage error: {e}");
                "internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!(%request_id, "Internal error: {e:#}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: ErrorBody { code, message },
                request_id,
            }),
        )
            .into_response()
    }
}
