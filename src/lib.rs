//! Jadwal - doctor schedule pipeline for brochures and story images
//!
//! Resolves the doctor roster from a cache, the live spreadsheet endpoint, or
//! a built-in fallback, and balances it over the brochure's printed columns.
//! Rendering is left to the consumer of the HTTP API.

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod leave;
pub mod roster;
pub mod routes;
pub mod upstream;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

pub use crate::cache::{CacheBackend, InMemoryCache, RedisCache};
pub use crate::config::Config;
pub use crate::layout::{ColumnAssignment, ColumnBalancer};
pub use crate::roster::{CacheWarmer, Resolution, Tier, TieredDataSource};
pub use crate::upstream::{ResilientFetcher, UpstreamClient};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    pub cache: Arc<CacheBackend>,
    pub upstream: Arc<UpstreamClient>,
    pub roster_source: Arc<TieredDataSource>,
    pub balancer: ColumnBalancer,
}

impl AppState {
    /// Create a new application state, connecting to Redis when configured
    pub async fn new(config: Config) -> Result<Self> {
        let cache = match config.redis_url.as_deref() {
            Some(url) => {
                let redis_client = redis::Client::open(url)?;
                let conn = redis::aio::ConnectionManager::new(redis_client).await?;
                info!("Using Redis roster cache");
                CacheBackend::Redis(RedisCache::new(conn))
            }
            None => {
                info!("REDIS_URL not set, using in-process roster cache");
                CacheBackend::InMemory(InMemoryCache::new())
            }
        };

        Self::with_cache(config, Arc::new(cache))
    }

    /// Create application state around an existing cache backend
    pub fn with_cache(config: Config, cache: Arc<CacheBackend>) -> Result<Self> {
        let fetcher = ResilientFetcher::new(config.fetcher())?;
        let upstream = Arc::new(UpstreamClient::new(fetcher, &config));
        let roster_source = Arc::new(TieredDataSource::new(cache.clone(), upstream.clone()));
        let balancer = ColumnBalancer::new(config.layout.clone());

        Ok(Self {
            config,
            start_time: Instant::now(),
            cache,
            upstream,
            roster_source,
            balancer,
        })
    }

    /// Cache warmer sharing this state's cache and upstream
    pub fn cache_warmer(&self) -> CacheWarmer {
        CacheWarmer::new(
            self.cache.clone(),
            self.upstream.clone(),
            self.config.cache_ttl_seconds,
        )
    }
}
