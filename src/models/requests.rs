//! Request models for the proxy
//!
//! Extracts the source identifier from an inbound request.

use axum::http::HeaderMap;

/// Source identifier carried by an inbound proxy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    /// URL of the remote resource to mirror
    pub source: String,
}

impl SourceRequest {
    /// Reads the source URL from the named header. A missing or
    /// non-text header yields an empty source.
    pub fn from_headers(headers: &HeaderMap, header: &str) -> Self {
        let source = headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        Self { source }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.source.is_empty() {
            return Some("source identifier not provided".to_string());
        }
        None
    }
}
