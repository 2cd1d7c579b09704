//! Request and Response models for the proxy API
//!
//! Inbound source extraction and the JSON bodies of the service endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SourceRequest;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
