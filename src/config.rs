//! Configuration management for Jadwal
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::layout::BalancerConfig;
use crate::upstream::FetcherConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Redis connection URL; the in-process cache is used when unset
    pub redis_url: Option<String>,

    /// Roster endpoint (JSON keyed by specialization id)
    pub roster_api_url: String,
    /// Leave endpoint; story endpoints are disabled when unset
    pub leave_api_url: Option<String>,

    /// Upstream fetch timeout (in seconds)
    pub fetch_timeout_seconds: u64,
    /// Append a cache-busting query parameter to upstream requests
    pub fetch_cache_bust: bool,

    /// TTL of roster snapshots written by the warmer (in seconds)
    pub cache_ttl_seconds: u64,
    /// Warmer interval (in seconds); 0 disables the warmer
    pub cache_refresh_seconds: u64,

    /// Overall deadline for a single HTTP request (in seconds)
    pub request_timeout_seconds: u64,
    /// Time the live tier gets inside a request before the fallback is
    /// served instead (in seconds)
    pub roster_deadline_seconds: u64,

    /// Default brochure column count
    pub brochure_columns: usize,
    /// Column balancer weights and tolerance
    pub layout: BalancerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = BalancerConfig::default();

        Ok(Self {
            host: env::var("JADWAL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("JADWAL_PORT", 8080)?,

            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),

            roster_api_url: env::var("ROSTER_API_URL").context("ROSTER_API_URL must be set")?,
            leave_api_url: env::var("LEAVE_API_URL").ok().filter(|v| !v.is_empty()),

            fetch_timeout_seconds: parse_var("FETCH_TIMEOUT_SECONDS", 15)?,
            fetch_cache_bust: env::var("FETCH_CACHE_BUST")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),

            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", 3600)?,
            cache_refresh_seconds: parse_var("CACHE_REFRESH_SECONDS", 0)?,

            request_timeout_seconds: parse_var("REQUEST_TIMEOUT_SECONDS", 30)?,
            roster_deadline_seconds: parse_var("ROSTER_DEADLINE_SECONDS", 20)?,

            brochure_columns: parse_var("BROCHURE_COLUMNS", 4)?,
            layout: BalancerConfig {
                header_weight: parse_var("LAYOUT_HEADER_WEIGHT", defaults.header_weight)?,
                doctor_weight: parse_var("LAYOUT_DOCTOR_WEIGHT", defaults.doctor_weight)?,
                slack: parse_var("LAYOUT_SLACK", defaults.slack)?,
                continuation_suffix: env::var("LAYOUT_CONTINUATION_SUFFIX")
                    .unwrap_or(defaults.continuation_suffix),
            },
        })
    }

    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.fetch_timeout_seconds),
            cache_bust: self.fetch_cache_bust,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn roster_deadline(&self) -> Duration {
        Duration::from_secs(self.roster_deadline_seconds)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {name}")),
        Err(_) => Ok(default),
    }
}
