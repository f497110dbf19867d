use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::tmdb::TmdbError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid request input; raised before any upstream call.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] TmdbError),

    /// The upstream answered 2xx but left out a field we rely on.
    #[error("malformed upstream response: {0}")]
    MalformedUpstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedUpstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::MalformedUpstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => (msg.clone(), None),
            AppError::Upstream(e) => {
                error!("Upstream error: {}", e);
                (
                    "Failed to reach the movie database".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::MalformedUpstream(msg) => {
                error!("Malformed upstream response: {}", msg);
                (
                    "Unexpected response from the movie database".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (msg.clone(), None)
            }
        };

        let body = ErrorResponse {
            error: message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
