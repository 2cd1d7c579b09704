//! Mirror Cache - A transparent HTTP caching proxy
//!
//! Serves remote resources from a local copy, downloading again only when
//! the origin reports a different modification time.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod sync;

pub use api::AppState;
pub use config::Config;
pub use sync::SyncCoordinator;
