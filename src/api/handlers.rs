//! API Handlers
//!
//! HTTP request handlers for the proxy and its service endpoints.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};

use crate::cache::{CacheStore, FsStore};
use crate::config::Config;
use crate::error::{ProxyError, ProxyResult};
use crate::models::{HealthResponse, SourceRequest, StatsResponse};
use crate::remote::{HttpTransport, Transport};
use crate::sync::SyncCoordinator;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resolves source URLs against the cache
    pub coordinator: Arc<SyncCoordinator>,
    /// Header carrying the source URL
    pub source_header: Arc<str>,
}

impl AppState {
    /// Creates a new AppState around a coordinator.
    pub fn new(coordinator: SyncCoordinator, source_header: &str) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            source_header: Arc::from(source_header),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires an HTTP transport and a filesystem store rooted at the
    /// configured cache path.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout(), config.read_timeout())
            .context("building HTTP client")?;
        let transport: Arc<dyn Transport> = Arc::new(transport);
        let storage = FsStore::new(&config.cache_path, config.atomic_writes);
        let coordinator = SyncCoordinator::new(transport, CacheStore::new(Arc::new(storage)))
            .with_key_locking(config.key_locking);

        Ok(Self::new(coordinator, &config.source_header))
    }
}

/// Fallback handler for every other path and method.
///
/// Serves the bytes of the resource named by the source header verbatim.
pub async fn proxy_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ProxyResult<Vec<u8>> {
    let req = SourceRequest::from_headers(&headers, &state.source_header);
    if let Some(error_msg) = req.validate() {
        return Err(ProxyError::BadRequest(error_msg));
    }

    state.coordinator.resolve(&req.source).await
}

/// Handler for GET /stats
///
/// Returns current proxy statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.coordinator.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
