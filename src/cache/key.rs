//! Cache Key Module
//!
//! Derives the fixed-length addressing key for a source URL.

use std::fmt;

use md5::{Digest, Md5};

/// Length of a derived key in hex characters.
pub const KEY_LENGTH: usize = 32;

// == Cache Key ==
/// Lowercase hex MD5 digest of a source identifier.
///
/// The digest is unsalted, so keys are stable across restarts and
/// entries written by one process are found by the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a source identifier.
    pub fn derive(source: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The key as a string slice, usable as a file name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
