//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures raised by the individual proxy components.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Origin answered but its freshness header could not be parsed
    #[error("Malformed Last-Modified header: {0}")]
    RemoteProtocol(String),

    /// Origin could not be reached
    #[error("Origin unavailable: {0}")]
    RemoteUnavailable(String),

    /// No content blob stored for the key
    #[error("No cached content for key {0}")]
    CacheMiss(String),

    /// Freshness record exists but is not a decimal integer
    #[error("Corrupt freshness record for key {key}: {reason}")]
    CorruptCacheRecord { key: String, reason: String },

    /// Persisting an artifact failed
    #[error("Failed to write cache entry: {0}")]
    StorageWrite(String),

    /// Reading an artifact failed for a reason other than absence
    #[error("Failed to read cache entry: {0}")]
    StorageRead(String),
}

// == Proxy Error Enum ==
/// Caller-facing classification of a failed proxy request.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The request or the remote source it names is at fault
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage or internal failure
    #[error("Server error: {0}")]
    ServerError(String),
}

impl ProxyError {
    /// Wraps a component error as a request fault.
    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        ProxyError::BadRequest(err.to_string())
    }

    /// Wraps a component error as a server fault.
    pub fn server(err: impl std::fmt::Display) -> Self {
        ProxyError::ServerError(err.to_string())
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ProxyError::BadRequest(msg) | ProxyError::ServerError(msg) => msg,
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for component operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned to the request pipeline.
pub type ProxyResult<T> = std::result::Result<T, ProxyError>;
