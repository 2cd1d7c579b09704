//! Freshness Oracle
//!
//! Asks the origin when a resource last changed, without downloading it.

use chrono::DateTime;

use crate::error::{CacheError, Result};
use crate::remote::Transport;

/// Queries the origin's `Last-Modified` time for `source` as Unix seconds.
///
/// `Ok(None)` means the origin sent no such header. The response status is
/// not inspected.
pub async fn query_remote_freshness(transport: &dyn Transport, source: &str) -> Result<Option<i64>> {
    let head = transport.head(source).await?;
    head.last_modified
        .as_deref()
        .map(parse_http_date)
        .transpose()
}

/// Parses an HTTP date such as `Tue, 01 Jan 2019 00:00:00 GMT`.
pub fn parse_http_date(value: &str) -> Result<i64> {
    DateTime::parse_from_rfc2822(value.trim())
        .map(|dt| dt.timestamp())
        .map_err(|e| CacheError::RemoteProtocol(format!("{:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{FetchedBody, HeadResponse};
    use async_trait::async_trait;

    struct FixedHead(Option<&'static str>);

    #[async_trait]
    impl Transport for FixedHead {
        async fn head(&self, _url: &str) -> Result<HeadResponse> {
            Ok(HeadResponse {
                last_modified: self.0.map(str::to_string),
            })
        }

        async fn get(&self, _url: &str) -> Result<FetchedBody> {
            unreachable!("freshness queries never download")
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn head(&self, url: &str) -> Result<HeadResponse> {
            Err(CacheError::RemoteUnavailable(url.to_string()))
        }

        async fn get(&self, url: &str) -> Result<FetchedBody> {
            Err(CacheError::RemoteUnavailable(url.to_string()))
        }
    }

    #[test]
    fn test_parse_gmt_date() {
        assert_eq!(
            parse_http_date("Tue, 01 Jan 2019 00:00:00 GMT").unwrap(),
            1546300800
        );
    }

    #[test]
    fn test_parse_named_zone() {
        // MST is seven hours behind UTC
        assert_eq!(
            parse_http_date("Mon, 02 Jan 2006 15:04:05 MST").unwrap(),
            parse_http_date("Mon, 02 Jan 2006 22:04:05 GMT").unwrap()
        );
    }

    #[test]
    fn test_parse_garbage_is_protocol_error() {
        let result = parse_http_date("last tuesday");
        assert!(matches!(result, Err(CacheError::RemoteProtocol(_))));
    }

    #[tokio::test]
    async fn test_query_present_header() {
        let oracle = FixedHead(Some("Tue, 01 Jan 2019 00:00:00 GMT"));
        let fresh = query_remote_freshness(&oracle, "http://example.test/file.bin")
            .await
            .unwrap();
        assert_eq!(fresh, Some(1546300800));
    }

    #[tokio::test]
    async fn test_query_absent_header() {
        let fresh = query_remote_freshness(&FixedHead(None), "http://a/x")
            .await
            .unwrap();
        assert_eq!(fresh, None);
    }

    #[tokio::test]
    async fn test_query_unparsable_header() {
        let result = query_remote_freshness(&FixedHead(Some("soon")), "http://a/x").await;
        assert!(matches!(result, Err(CacheError::RemoteProtocol(_))));
    }

    #[tokio::test]
    async fn test_query_unreachable_origin() {
        let result = query_remote_freshness(&Unreachable, "http://a/x").await;
        assert!(matches!(result, Err(CacheError::RemoteUnavailable(_))));
    }
}
