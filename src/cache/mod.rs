//! Cache Module
//!
//! Persistent cache entries for mirrored resources: key derivation, the
//! byte store underneath, and the blob + freshness record pair on top.

mod key;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use key::{CacheKey, KEY_LENGTH};
pub use stats::ProxyStats;
pub use storage::{ByteStore, FsStore, MemoryStore};
pub use store::{CacheStore, INDEX_SUFFIX};
