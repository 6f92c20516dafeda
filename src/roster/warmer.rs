//! Roster cache warmer
//!
//! Populates the roster snapshot that [`TieredDataSource`] reads. The
//! resolver never writes to the cache itself; this job is the only writer.
//!
//! [`TieredDataSource`]: super::TieredDataSource

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::{keys, CacheBackend},
    roster::{source::TierError, RosterFeed},
    routes::metrics,
};

/// Periodic live-roster → cache copier
pub struct CacheWarmer {
    cache: Arc<CacheBackend>,
    feed: Arc<dyn RosterFeed>,
    ttl_seconds: u64,
}

impl CacheWarmer {
    pub fn new(cache: Arc<CacheBackend>, feed: Arc<dyn RosterFeed>, ttl_seconds: u64) -> Self {
        Self {
            cache,
            feed,
            ttl_seconds,
        }
    }

    /// Fetch the live roster and store it; returns the number of groups
    /// written. An empty roster is not written so a good snapshot survives a
    /// blank sheet.
    #[instrument(skip(self))]
    pub async fn refresh_once(&self) -> Result<usize, TierError> {
        let groups = self.feed.fetch_roster().await?;
        if groups.is_empty() {
            debug!("Live roster empty, keeping existing snapshot");
            return Ok(0);
        }

        self.cache
            .set_with_ttl(keys::ROSTER, &groups, self.ttl_seconds)
            .await
            .map_err(|e| TierError::CacheUnavailable(e.to_string()))?;

        debug!(groups = groups.len(), ttl = self.ttl_seconds, "Roster snapshot written");
        Ok(groups.len())
    }

    /// Run [`refresh_once`](Self::refresh_once) every `interval`, starting
    /// immediately
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        info!(interval_s = interval.as_secs(), "Starting roster cache warmer");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match self.refresh_once().await {
                    Ok(written) => {
                        metrics::record_cache_refresh("ok");
                        debug!(groups = written, "Roster cache refresh complete");
                    }
                    Err(e) => {
                        metrics::record_cache_refresh("error");
                        warn!(error = %e, "Roster cache refresh failed");
                    }
                }
            }
        })
    }
}
