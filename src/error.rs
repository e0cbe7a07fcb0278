//! Error types for the blog server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::repository::RepoError;

// == App Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// A uniqueness rule was broken (slug or tag already taken)
    #[error("{0}")]
    Conflict(String),

    /// The authoritative store failed
    #[error("data access failed: {0}")]
    DataAccess(#[from] RepoError),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DataAccess(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a store failure, turning uniqueness violations into conflicts.
    pub fn from_repo(err: RepoError, conflict_message: impl Into<String>) -> Self {
        match err {
            RepoError::Duplicate { .. } => AppError::Conflict(conflict_message.into()),
            other => AppError::DataAccess(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::InvalidRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            // Store and internal details stay in the logs.
            AppError::DataAccess(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                "Internal Server Error".to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, AppError>;
