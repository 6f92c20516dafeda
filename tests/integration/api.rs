//! HTTP API integration tests
//!
//! Tests for the renderer-facing endpoints:
//! - GET /api/v1/roster
//! - GET /api/v1/brochure/columns
//! - GET /api/v1/story/doctors
//! - GET /health, /health/ready, /health/live

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use jadwal::leave::{PLACEHOLDER_PHOTO, UNKNOWN_SPECIALIZATION};

use crate::common::{in_memory_cache, test_config, test_server, test_state};
use crate::mocks::{MockUpstreamServer, UpstreamTestData};

async fn server_with_roster() -> (MockUpstreamServer, axum_test::TestServer) {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(UpstreamTestData::roster()).await;
    upstream.mock_leave_success(UpstreamTestData::leaves()).await;
    let config = test_config(&upstream.roster_url(), Some(&upstream.leave_url()));
    let server = test_server(test_state(config, in_memory_cache()));
    (upstream, server)
}

fn doctors_in_columns(body: &Value) -> usize {
    body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["groups"].as_array().unwrap())
        .map(|g| g["doctors"].as_array().unwrap().len())
        .sum()
}

// =============================================================================
// GET /api/v1/roster
// =============================================================================

#[tokio::test]
async fn test_roster_reports_live_tier() {
    let (_upstream, server) = server_with_roster().await;

    let response = server.get("/api/v1/roster").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tier"], "live");
    assert_eq!(body["groups"][0]["title"], "Anak");
    assert_eq!(body["groups"][0]["doctors"][0]["schedule"]["senin"], "08:00 - 12:00");
}

#[tokio::test]
async fn test_roster_falls_back_when_upstream_down() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_status(502).await;
    let server = test_server(test_state(
        test_config(&upstream.roster_url(), None),
        in_memory_cache(),
    ));

    let response = server.get("/api/v1/roster").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tier"], "fallback");
    assert!(!body["groups"].as_array().unwrap().is_empty());
}

// =============================================================================
// GET /api/v1/brochure/columns
// =============================================================================

#[tokio::test]
async fn test_brochure_uses_default_column_count() {
    let (_upstream, server) = server_with_roster().await;

    let response = server.get("/api/v1/brochure/columns").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tier"], "live");
    assert_eq!(body["doctor_count"], 4);
    assert_eq!(body["columns"].as_array().unwrap().len(), 2);
    assert_eq!(doctors_in_columns(&body), 4);
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn test_brochure_column_query() {
    let (_upstream, server) = server_with_roster().await;

    let response = server
        .get("/api/v1/brochure/columns")
        .add_query_param("columns", 3)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 3);
    let indices: Vec<u64> = columns
        .iter()
        .map(|c| c["column_index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(doctors_in_columns(&body), 4);
}

#[tokio::test]
async fn test_brochure_zero_columns_is_bad_request() {
    let (_upstream, server) = server_with_roster().await;

    let response = server
        .get("/api/v1/brochure/columns")
        .add_query_param("columns", 0)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// GET /api/v1/story/doctors
// =============================================================================

#[tokio::test]
async fn test_story_lists_current_leave() {
    let (_upstream, server) = server_with_roster().await;

    let response = server.get("/api/v1/story/doctors").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["roster_tier"], "live");

    let doctors = body["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 2);

    assert_eq!(doctors[0]["id"], "doc-0");
    assert_eq!(doctors[0]["name"], "dr. Ayu Lestari, Sp.A");
    assert_eq!(doctors[0]["specialization"], "Anak");
    assert_eq!(doctors[0]["photo_url"], "https://img.example/ayu.png");
    assert_eq!(doctors[0]["leave_end"], "2099-12-31");

    assert_eq!(doctors[1]["id"], "doc-2");
    assert_eq!(doctors[1]["specialization"], UNKNOWN_SPECIALIZATION);
    assert_eq!(doctors[1]["photo_url"], PLACEHOLDER_PHOTO);
}

#[tokio::test]
async fn test_story_selection_keeps_requested_order() {
    let (_upstream, server) = server_with_roster().await;

    let response = server
        .get("/api/v1/story/doctors")
        .add_query_param("doctors", "doc-2,doc-0")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let ids: Vec<&str> = body["doctors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["doc-2", "doc-0"]);
}

#[tokio::test]
async fn test_story_selection_without_match_is_not_found() {
    let (_upstream, server) = server_with_roster().await;

    // doc-1's leave ended in 2020
    let response = server
        .get("/api/v1/story/doctors")
        .add_query_param("doctors", "doc-1")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_story_without_leave_feed_is_unavailable() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(UpstreamTestData::roster()).await;
    let server = test_server(test_state(
        test_config(&upstream.roster_url(), None),
        in_memory_cache(),
    ));

    let response = server.get("/api/v1/story/doctors").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_story_leave_feed_failure_is_bad_gateway() {
    let upstream = MockUpstreamServer::start().await;
    upstream.mock_roster_success(UpstreamTestData::roster()).await;
    upstream.mock_leave_status(500).await;
    let server = test_server(test_state(
        test_config(&upstream.roster_url(), Some(&upstream.leave_url())),
        in_memory_cache(),
    ));

    let response = server.get("/api/v1/story/doctors").await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_story_waits_for_slow_feeds_concurrently() {
    let upstream = MockUpstreamServer::start().await;
    let delay = Duration::from_millis(1800);
    upstream
        .mock_roster_slow(UpstreamTestData::roster(), delay)
        .await;
    upstream
        .mock_leave_slow(UpstreamTestData::leaves(), delay)
        .await;
    let mut config = test_config(&upstream.roster_url(), Some(&upstream.leave_url()));
    config.fetch_timeout_seconds = 2;
    config.roster_deadline_seconds = 2;
    config.request_timeout_seconds = 3;
    let server = test_server(test_state(config, in_memory_cache()));

    // Each feed fits the request budget alone; back to back they would not
    let response = server.get("/api/v1/story/doctors").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["roster_tier"], "live");
    assert_eq!(body["doctors"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_cache_backend() {
    let (_upstream, server) = server_with_roster().await;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["cache"]["backend"], "in_memory");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let (_upstream, server) = server_with_roster().await;

    for path in ["/health/live", "/health/ready"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
    }
}
