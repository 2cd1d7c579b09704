//! Per-Key Locks
//!
//! Mutual exclusion keyed by [`CacheKey`], so that only one refresh of a
//! given entry runs at a time while unrelated keys proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::cache::CacheKey;

type LockMap = HashMap<CacheKey, Arc<AsyncMutex<()>>>;

/// Map from cache key to an async mutex, created on demand.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has `key`, then returns a guard that
    /// releases it on drop.
    pub async fn acquire(&self, key: &CacheKey) -> KeyGuard {
        let mutex = {
            let mut map = self.map();
            map.entry(key.clone()).or_default().clone()
        };

        KeyGuard {
            locks: self.clone(),
            key: key.clone(),
            guard: Some(mutex.lock_owned().await),
        }
    }

    /// Number of keys currently held or waited on.
    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.map().len()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, LockMap> {
        // The map is only touched in short non-panicking sections
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release(&self, key: &CacheKey) {
        let mut map = self.map();
        if map
            .get(key)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            map.remove(key);
        }
    }
}

/// Held lock on one key.
#[derive(Debug)]
pub struct KeyGuard {
    locks: KeyLocks,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Unlock first so the map entry is prunable when nobody waits
        self.guard.take();
        self.locks.release(&self.key);
    }
}
