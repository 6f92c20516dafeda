//! Redis cache implementation
//!
//! Holds roster snapshots written by the cache warmer.

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

/// Redis cache wrapper
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Create a new Redis cache
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => {
                let parsed: T = serde_json::from_str(&v)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL; zero means no expiry
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let serialized = serde_json::to_string(value)?;
        if ttl_seconds > 0 {
            let _: () = conn.set_ex(key, serialized, ttl_seconds).await?;
        } else {
            let _: () = conn.set(key, serialized).await?;
        }
        Ok(())
    }

    /// Round-trip a PING to the server
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        expect_pong(&reply)
    }
}

fn expect_pong(reply: &str) -> AppResult<()> {
    if reply == "PONG" {
        Ok(())
    } else {
        Err(AppError::ServiceUnavailable(format!(
            "unexpected PING reply: {reply}"
        )))
    }
}

/// Cache keys
pub mod keys {
    /// Roster snapshot key, shared with the scheduled cache job
    pub const ROSTER: &str = "jadwal-dokter-cache";
}
