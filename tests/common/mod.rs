//! Common test utilities for Jadwal
//!
//! Shared configuration and state builders used across the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;

use jadwal::{layout::BalancerConfig, routes, AppState, CacheBackend, Config, InMemoryCache};

/// Config pointing at a mock upstream, with the cache-bust parameter on
pub fn test_config(roster_url: &str, leave_url: Option<&str>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        redis_url: None,
        roster_api_url: roster_url.to_string(),
        leave_api_url: leave_url.map(str::to_string),
        fetch_timeout_seconds: 2,
        fetch_cache_bust: true,
        cache_ttl_seconds: 300,
        cache_refresh_seconds: 0,
        request_timeout_seconds: 10,
        roster_deadline_seconds: 5,
        brochure_columns: 2,
        layout: BalancerConfig::default(),
    }
}

/// Fresh in-process cache backend
pub fn in_memory_cache() -> Arc<CacheBackend> {
    Arc::new(CacheBackend::InMemory(InMemoryCache::new()))
}

/// Application state around the given cache
pub fn test_state(config: Config, cache: Arc<CacheBackend>) -> Arc<AppState> {
    Arc::new(AppState::with_cache(config, cache).expect("failed to build app state"))
}

/// Test server for the full router
pub fn test_server(state: Arc<AppState>) -> TestServer {
    TestServer::new(routes::create_router(state)).expect("failed to start test server")
}

/// Short timeout used by the fetcher timeout tests
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(300);
