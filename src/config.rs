//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::warn;

/// Default inbound header carrying the source URL.
pub const DEFAULT_SOURCE_HEADER: &str = "File";

/// Proxy configuration parameters.
///
/// Everything except the cache directory has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding cached blobs and freshness records
    pub cache_path: PathBuf,
    /// Interface to bind
    pub host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Timeout in seconds for connecting and for the freshness check
    pub request_timeout: u64,
    /// Longest wait in seconds for more data during a download
    pub read_timeout: u64,
    /// Serialize refreshes of the same cache key
    pub key_locking: bool,
    /// Write artifacts through a temporary file and rename
    pub atomic_writes: bool,
    /// Name of the inbound header carrying the source URL
    pub source_header: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PATH` - Cache directory (required)
    /// - `HOST` - Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 80)
    /// - `REQUEST_TIMEOUT` - Connect and HEAD timeout in seconds (default: 30)
    /// - `READ_TIMEOUT` - Download idle timeout in seconds (default: 30)
    /// - `KEY_LOCKING` - Per-key mutual exclusion (default: true)
    /// - `ATOMIC_WRITES` - Rename-on-write persistence (default: false)
    /// - `SOURCE_HEADER` - Inbound header name (default: File)
    pub fn from_env() -> Result<Self> {
        let cache_path = match env::var("CACHE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => bail!("CACHE_PATH must be set to the cache directory"),
        };

        let defaults = Self::with_cache_path(cache_path);

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            request_timeout: parse_var("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            read_timeout: parse_var("READ_TIMEOUT").unwrap_or(defaults.read_timeout),
            key_locking: parse_var("KEY_LOCKING").unwrap_or(defaults.key_locking),
            atomic_writes: parse_var("ATOMIC_WRITES").unwrap_or(defaults.atomic_writes),
            source_header: env::var("SOURCE_HEADER").unwrap_or(defaults.source_header),
            cache_path: defaults.cache_path,
        })
    }

    /// Creates a Config with default settings for the given cache directory.
    pub fn with_cache_path(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            host: "0.0.0.0".to_string(),
            server_port: 80,
            request_timeout: 30,
            read_timeout: 30,
            key_locking: true,
            atomic_writes: false,
            source_header: DEFAULT_SOURCE_HEADER.to_string(),
        }
    }

    /// Connect and freshness check timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Idle timeout while a download is in progress.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.server_port)
    }
}

/// Parses an optional variable; an unparsable value is reported and ignored.
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value {:?} for {}, using default", raw, name);
            None
        }
    }
}
