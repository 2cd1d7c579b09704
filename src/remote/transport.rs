//! Outbound Transport Module
//!
//! HTTP calls to the origin: a header-only freshness check and a full download.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LAST_MODIFIED;

use crate::error::{CacheError, Result};

/// Headers of interest from a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    /// Raw `Last-Modified` value, if the origin sent one
    pub last_modified: Option<String>,
}

/// Complete response of a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedBody {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// == Transport Trait ==
/// Origin access used by the proxy.
///
/// Connection failures and timeouts surface as
/// [`CacheError::RemoteUnavailable`]. Any HTTP status counts as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn head(&self, url: &str) -> Result<HeadResponse>;

    async fn get(&self, url: &str) -> Result<FetchedBody>;
}

// == HTTP Transport ==
/// [`Transport`] backed by a shared reqwest client.
///
/// A HEAD request has a total deadline. Downloads only have connect and
/// idle-read deadlines, so a large body that keeps arriving is never cut off.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    head_timeout: Duration,
}

impl HttpTransport {
    /// Builds a client. `head_timeout` bounds the connect and the whole
    /// HEAD exchange; `read_timeout` bounds each wait for data on a GET.
    pub fn new(head_timeout: Duration, read_timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(head_timeout)
            .read_timeout(read_timeout)
            .build()?;
        Ok(Self {
            client,
            head_timeout,
        })
    }
}

fn unavailable(url: &str, err: reqwest::Error) -> CacheError {
    CacheError::RemoteUnavailable(format!("{}: {}", url, err))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &str) -> Result<HeadResponse> {
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .await
            .map_err(|e| unavailable(url, e))?;

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Ok(HeadResponse { last_modified })
    }

    async fn get(&self, url: &str) -> Result<FetchedBody> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(url, e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| unavailable(url, e))?;

        Ok(FetchedBody {
            status,
            body: body.to_vec(),
        })
    }
}
