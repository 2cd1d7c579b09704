//! Proxy Statistics Module
//!
//! Tracks how requests were resolved: served from cache, refreshed from the
//! origin, or failed.

use serde::Serialize;

// == Proxy Stats ==
/// Counters for resolved proxy requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProxyStats {
    /// Requests that reached the coordinator
    pub requests: u64,
    /// Requests served from cache without a full fetch
    pub fresh_hits: u64,
    /// Full fetches from the origin
    pub refreshes: u64,
    /// Requests rejected as caller faults
    pub request_errors: u64,
    /// Requests failed by storage or internal faults
    pub server_errors: u64,
}

impl ProxyStats {
    // == Constructor ==
    /// Creates a new ProxyStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of successful requests served without a full fetch.
    ///
    /// Returns 0.0 if nothing has been served yet.
    pub fn hit_rate(&self) -> f64 {
        let served = self.fresh_hits + self.refreshes;
        if served == 0 {
            0.0
        } else {
            self.fresh_hits as f64 / served as f64
        }
    }

    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    pub fn record_fresh_hit(&mut self) {
        self.fresh_hits += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    pub fn record_request_error(&mut self) {
        self.request_errors += 1;
    }

    pub fn record_server_error(&mut self) {
        self.server_errors += 1;
    }
}
