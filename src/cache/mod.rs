//! Cache module
//!
//! Key-value storage for roster snapshots, backed by Redis in production or
//! an in-process map when Redis is not configured.

pub mod in_memory;
pub mod redis;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

pub use self::in_memory::InMemoryCache;
pub use self::redis::{keys, RedisCache};

/// Cache backend abstraction
pub enum CacheBackend {
    /// Redis-based cache for production use
    Redis(RedisCache),
    /// In-process cache
    InMemory(InMemoryCache),
}

impl CacheBackend {
    /// Name of the backend for health reporting
    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::Redis(_) => "redis",
            CacheBackend::InMemory(_) => "in_memory",
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self {
            CacheBackend::Redis(cache) => cache.get(key).await,
            CacheBackend::InMemory(cache) => cache.get(key).await,
        }
    }

    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        match self {
            CacheBackend::Redis(cache) => cache.set_with_ttl(key, value, ttl_seconds).await,
            CacheBackend::InMemory(cache) => cache.set_with_ttl(key, value, ttl_seconds).await,
        }
    }

    /// Check the backend is reachable
    pub async fn ping(&self) -> AppResult<()> {
        match self {
            CacheBackend::Redis(cache) => cache.ping().await,
            CacheBackend::InMemory(_) => Ok(()),
        }
    }
}
