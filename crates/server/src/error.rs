//! HTTP error mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use studytrack_progress::ProgressError;
use tracing::error;

/// Error returned by API handlers, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client sent an incomplete or invalid request
    #[error("{0}")]
    BadRequest(String),

    /// Referenced module or subject does not exist
    #[error("{0}")]
    NotFound(String),

    /// Storage or other server-side failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Error for a request body lacking required fields.
    pub fn missing_fields() -> Self {
        Self::BadRequest("Missing fields".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::EmptyName(_) => Self::missing_fields(),
            e @ (ProgressError::ModuleNotFound(_) | ProgressError::SubjectNotFound { .. }) => {
                Self::NotFound(e.to_string())
            }
            ProgressError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("  Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
