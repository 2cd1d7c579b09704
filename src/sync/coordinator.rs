//! Sync Coordinator
//!
//! Resolves a source URL to bytes: asks the origin for its freshness, refreshes
//! the local copy when it differs from what was recorded, and serves the
//! stored blob.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheStore, ProxyStats};
use crate::error::{ProxyError, ProxyResult};
use crate::remote::{query_remote_freshness, Transport};
use crate::sync::KeyLocks;

/// Whether a recorded freshness must be replaced.
///
/// Any difference counts, including a remote time earlier than the
/// recorded one. Without a remote time the entry is never stale.
pub fn is_stale(remote: Option<i64>, local: i64) -> bool {
    matches!(remote, Some(ts) if ts != local)
}

// == Sync Coordinator ==
/// Ties the freshness oracle, the cache store and the transport together.
pub struct SyncCoordinator {
    transport: Arc<dyn Transport>,
    store: CacheStore,
    locks: Option<KeyLocks>,
    stats: RwLock<ProxyStats>,
}

impl SyncCoordinator {
    /// Creates a coordinator with per-key locking enabled.
    pub fn new(transport: Arc<dyn Transport>, store: CacheStore) -> Self {
        Self {
            transport,
            store,
            locks: Some(KeyLocks::new()),
            stats: RwLock::new(ProxyStats::new()),
        }
    }

    /// Enables or disables serialization of refreshes per key.
    ///
    /// Without it, concurrent refreshes of one key all fetch and the last
    /// writer wins on each artifact.
    pub fn with_key_locking(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(KeyLocks::new);
        self
    }

    #[cfg(test)]
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Snapshot of the request counters.
    pub async fn stats(&self) -> ProxyStats {
        self.stats.read().await.clone()
    }

    // == Resolve ==
    /// Returns the current bytes of `source`, refreshing the cache first if
    /// the origin reports a different modification time.
    ///
    /// Failing to learn the origin's freshness is a request fault; everything
    /// after that is a server fault.
    pub async fn resolve(&self, source: &str) -> ProxyResult<Vec<u8>> {
        let result = self.resolve_entry(source).await;

        let mut stats = self.stats.write().await;
        stats.record_request();
        match &result {
            Ok((_, true)) => stats.record_refresh(),
            Ok((_, false)) => stats.record_fresh_hit(),
            Err(err @ ProxyError::BadRequest(_)) => {
                warn!(source, error = %err, "rejected proxy request");
                stats.record_request_error();
            }
            Err(err @ ProxyError::ServerError(_)) => {
                warn!(source, error = %err, "failed to serve proxy request");
                stats.record_server_error();
            }
        }

        result.map(|(content, _)| content)
    }

    /// Resolves and reports whether a full fetch took place.
    async fn resolve_entry(&self, source: &str) -> ProxyResult<(Vec<u8>, bool)> {
        let key = CacheKey::derive(source);

        let remote = query_remote_freshness(self.transport.as_ref(), source)
            .await
            .map_err(ProxyError::bad_request)?;

        let guard = match &self.locks {
            Some(locks) => Some(locks.acquire(&key).await),
            None => None,
        };

        let local = self
            .store
            .read_freshness(&key)
            .await
            .map_err(ProxyError::server)?;

        // Nothing to serve yet means a fetch even when the times agree
        let refresh = is_stale(remote, local)
            || !self
                .store
                .has_content(&key)
                .await
                .map_err(ProxyError::server)?;

        if !refresh {
            debug!(source, key = %key, local, "serving cached copy");
            let content = self
                .store
                .read_content(&key)
                .await
                .map_err(ProxyError::server)?;
            return Ok((content, false));
        }

        info!(source, key = %key, ?remote, local, "refreshing cached copy");
        let fetched = self
            .transport
            .get(source)
            .await
            .map_err(ProxyError::server)?;
        if !fetched.is_success() {
            warn!(source, status = fetched.status, "caching non-success response body");
        }

        // Detached so a disconnecting caller cannot stop the write halfway;
        // the key stays locked until the entry is read back.
        let store = self.store.clone();
        let timestamp = remote.unwrap_or(0);
        let content = tokio::spawn(async move {
            let _guard = guard;
            store.write_entry(&key, &fetched.body, timestamp).await?;
            store.read_content(&key).await
        })
        .await
        .map_err(ProxyError::server)?
        .map_err(ProxyError::server)?;

        Ok((content, true))
    }
}
