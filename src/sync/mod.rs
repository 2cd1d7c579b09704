//! Sync Module
//!
//! Coordinates freshness checks and refreshes of cache entries.

mod coordinator;
mod locks;

pub use coordinator::{is_stale, SyncCoordinator};
pub use locks::{KeyGuard, KeyLocks};
