//! Error types for the session cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors returned synchronously by every cache operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache has been closed; permanent, not retryable
    #[error("cache has been closed")]
    Closed,

    /// Key absent or logically expired
    #[error("key not found: {0}")]
    NotFound(String),

    /// A new key was rejected because the cache is at capacity
    #[error("cache max size exceeded (capacity {0})")]
    CapacityExceeded(usize),

    /// `add` found a live entry under the key
    #[error("item '{0}' already exists")]
    AlreadyExists(String),

    /// `replace` found no live entry under the key
    #[error("item '{0}' doesn't exist")]
    DoesNotExist(String),
}

impl CacheError {
    /// HTTP status used when the error reaches the API layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::NotFound(_) | CacheError::DoesNotExist(_) => StatusCode::NOT_FOUND,
            CacheError::CapacityExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::AlreadyExists(_) => StatusCode::CONFLICT,
        }
    }
}

// == Session Error Enum ==
/// Errors raised by the session registry.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Underlying cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A peer already joined the session
    #[error("session '{0}' is already connected")]
    AlreadyConnected(String),
}

// == IntoResponse Implementations ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match &self {
            SessionError::Cache(err) => err.status_code(),
            SessionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::AlreadyConnected(_) => StatusCode::CONFLICT,
        };
        error_response(status, self.to_string())
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message
    }));

    (status, body).into_response()
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type for session registry operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
