//! Response DTOs for the proxy API
//!
//! Defines the JSON bodies of the service endpoints. Proxied content is
//! returned verbatim and has no DTO.

use serde::Serialize;

use crate::cache::ProxyStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests that reached the coordinator
    pub requests: u64,
    /// Requests served without a full fetch
    pub fresh_hits: u64,
    /// Full fetches from the origin
    pub refreshes: u64,
    /// Requests rejected as caller faults
    pub request_errors: u64,
    /// Requests failed by server faults
    pub server_errors: u64,
    /// fresh_hits / (fresh_hits + refreshes)
    pub hit_rate: f64,
}

impl From<ProxyStats> for StatsResponse {
    fn from(stats: ProxyStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            requests: stats.requests,
            fresh_hits: stats.fresh_hits,
            refreshes: stats.refreshes,
            request_errors: stats.request_errors,
            server_errors: stats.server_errors,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
