//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Proxy statistics
//! - anything else - Proxy request; the source URL comes from the `File` header

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
