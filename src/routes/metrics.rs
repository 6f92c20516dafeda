//! Prometheus metrics endpoint
//!
//! Exposes roster resolution and cache refresh counters in Prometheus format.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

use crate::roster::Tier;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "jadwal_roster_resolutions_total",
        "Roster resolutions by serving tier"
    );
    metrics::describe_counter!(
        "jadwal_tier_failures_total",
        "Cache or upstream failures absorbed by tier fallthrough"
    );
    metrics::describe_counter!(
        "jadwal_cache_refresh_total",
        "Roster cache warmer runs by result"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record which tier served a roster
pub fn record_resolution(tier: Tier) {
    metrics::counter!("jadwal_roster_resolutions_total", "tier" => tier.as_str()).increment(1);
}

/// Record a failed tier, labelled with the failure kind
pub fn record_tier_failure(tier: Tier, kind: &'static str) {
    metrics::counter!(
        "jadwal_tier_failures_total",
        "tier" => tier.as_str(),
        "kind" => kind
    )
    .increment(1);
}

/// Record a cache warmer run
pub fn record_cache_refresh(result: &'static str) {
    metrics::counter!("jadwal_cache_refresh_total", "result" => result).increment(1);
}
