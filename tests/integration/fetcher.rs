//! Resilient fetcher integration tests
//!
//! Exercises redirect following, the timeout and body decoding against a
//! real HTTP server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use jadwal::upstream::{FetchError, FetcherConfig, ResilientFetcher, MAX_REDIRECTS};

use crate::common::SHORT_TIMEOUT;
use crate::mocks::{MockUpstreamServer, UpstreamTestData, ROSTER_PATH};

fn fetcher() -> ResilientFetcher {
    ResilientFetcher::new(FetcherConfig::default()).expect("fetcher")
}

#[tokio::test]
async fn test_fetch_decodes_json() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(json!({"ok": true})).await;

    let body: Value = fetcher().fetch(&upstream.roster_url()).await.unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_fetch_appends_cache_bust_parameter() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(json!({})).await;

    let _: Value = fetcher().fetch(&upstream.roster_url()).await.unwrap();

    let requests = upstream.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().any(|(k, _)| k == "t"));
}

#[tokio::test]
async fn test_fetch_without_cache_bust_sends_url_untouched() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(json!({})).await;
    let fetcher = ResilientFetcher::new(FetcherConfig {
        cache_bust: false,
        ..FetcherConfig::default()
    })
    .unwrap();

    let _: Value = fetcher.fetch(&upstream.roster_url()).await.unwrap();

    let requests = upstream.received_requests().await;
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_follows_exactly_max_redirects() {
    let upstream = MockUpstreamServer::start().await;
    let start = upstream
        .mock_redirect_chain("hop", MAX_REDIRECTS, json!({"arrived": true}))
        .await;

    let body: Value = fetcher().fetch(&start).await.unwrap();

    assert_eq!(body, json!({"arrived": true}));
    assert_eq!(upstream.received_requests().await.len(), MAX_REDIRECTS as usize + 1);
}

#[tokio::test]
async fn test_one_redirect_too_many_fails() {
    let upstream = MockUpstreamServer::start().await;
    let start = upstream
        .mock_redirect_chain("hop", MAX_REDIRECTS + 1, json!({"arrived": true}))
        .await;

    let err = fetcher().fetch::<Value>(&start).await.unwrap_err();

    assert_eq!(err, FetchError::TooManyRedirects(MAX_REDIRECTS));
    // The final hop is never requested
    assert_eq!(upstream.hits(&format!("/hop/{}", MAX_REDIRECTS + 1)).await, 0);
}

#[tokio::test]
async fn test_redirect_without_location_reports_status() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_redirect_without_location("/moved").await;

    let err = fetcher()
        .fetch::<Value>(&format!("{}/moved", upstream.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::HttpStatus(302));
}

#[tokio::test]
async fn test_non_success_status() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_status(500).await;

    let err = fetcher().fetch::<Value>(&upstream.roster_url()).await.unwrap_err();

    assert_eq!(err, FetchError::HttpStatus(500));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_raw("<html>maintenance</html>").await;

    let err = fetcher().fetch::<Value>(&upstream.roster_url()).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = MockUpstreamServer::start().await;
    upstream
        .mock_roster_slow(UpstreamTestData::roster(), Duration::from_secs(3))
        .await;
    let fetcher = ResilientFetcher::new(FetcherConfig {
        timeout: SHORT_TIMEOUT,
        cache_bust: false,
    })
    .unwrap();

    let err = fetcher.fetch::<Value>(&upstream.roster_url()).await.unwrap_err();

    assert_eq!(err, FetchError::Timeout(SHORT_TIMEOUT));
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = fetcher()
        .fetch::<Value>(&format!("http://127.0.0.1:{port}/getDoctors"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_url_is_rejected_without_request() {
    let upstream = MockUpstreamServer::start().await;

    let err = fetcher().fetch::<Value>("not a url").await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidUrl(_)));
    assert_eq!(upstream.hits(ROSTER_PATH).await, 0);
}
