//! Remote Module
//!
//! Everything that talks to the origin server.

mod freshness;
mod transport;

pub use freshness::{parse_http_date, query_remote_freshness};
pub use transport::{FetchedBody, HeadResponse, HttpTransport, Transport};
