//! Cache Store Module
//!
//! Reads and writes the two artifacts of a cache entry: the content blob
//! and its freshness record.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{ByteStore, CacheKey};
use crate::error::{CacheError, Result};

/// Suffix of the freshness record next to a content blob.
pub const INDEX_SUFFIX: &str = ".index";

// == Cache Store ==
/// Cache entries addressed by [`CacheKey`].
///
/// The blob lives under the key itself and the freshness record under
/// `<key>.index` as decimal text. The two are written independently; the
/// blob always goes first so a freshness record never points at missing
/// content.
#[derive(Debug, Clone)]
pub struct CacheStore {
    storage: Arc<dyn ByteStore>,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(storage: Arc<dyn ByteStore>) -> Self {
        Self { storage }
    }

    fn index_name(key: &CacheKey) -> String {
        format!("{}{}", key.as_str(), INDEX_SUFFIX)
    }

    // == Read Freshness ==
    /// Returns the recorded freshness for a key, or `0` when nothing has
    /// been recorded yet.
    pub async fn read_freshness(&self, key: &CacheKey) -> Result<i64> {
        let raw = self
            .storage
            .read(&Self::index_name(key))
            .await
            .map_err(|e| CacheError::StorageRead(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(0);
        };

        let corrupt = |reason: String| CacheError::CorruptCacheRecord {
            key: key.to_string(),
            reason,
        };
        let text = std::str::from_utf8(&raw).map_err(|e| corrupt(e.to_string()))?;
        text.trim()
            .parse::<i64>()
            .map_err(|e| corrupt(format!("{} ({:?})", e, text)))
    }

    // == Read Content ==
    /// Returns the cached blob, or [`CacheError::CacheMiss`] if none exists.
    pub async fn read_content(&self, key: &CacheKey) -> Result<Vec<u8>> {
        self.storage
            .read(key.as_str())
            .await
            .map_err(|e| CacheError::StorageRead(e.to_string()))?
            .ok_or_else(|| CacheError::CacheMiss(key.to_string()))
    }

    // == Has Content ==
    /// Reports whether a blob exists for the key, even an empty one.
    pub async fn has_content(&self, key: &CacheKey) -> Result<bool> {
        self.storage
            .exists(key.as_str())
            .await
            .map_err(|e| CacheError::StorageRead(e.to_string()))
    }

    // == Write Entry ==
    /// Persists content then freshness. A failure leaves whatever was
    /// already written in place.
    pub async fn write_entry(&self, key: &CacheKey, content: &[u8], timestamp: i64) -> Result<()> {
        self.storage
            .write(key.as_str(), content)
            .await
            .map_err(|e| CacheError::StorageWrite(format!("content for {}: {}", key, e)))?;

        self.storage
            .write(&Self::index_name(key), timestamp.to_string().as_bytes())
            .await
            .map_err(|e| CacheError::StorageWrite(format!("freshness for {}: {}", key, e)))?;

        debug!(key = %key, bytes = content.len(), timestamp, "cache entry written");
        Ok(())
    }
}
