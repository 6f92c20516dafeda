//! Tiered roster resolution
//!
//! Resolves the roster from, in order: the cached snapshot, the live
//! upstream, the built-in fallback. The first tier yielding at least one group
//! wins. Cache and upstream errors are logged and absorbed; the fallback tier
//! cannot fail, so resolution always produces a roster.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::{keys, CacheBackend},
    roster::{fallback::fallback_roster, SpecializationGroup},
    routes::metrics,
    upstream::FetchError,
};

/// Source of live roster data
#[async_trait]
pub trait RosterFeed: Send + Sync {
    /// Make one attempt at fetching the current roster
    async fn fetch_roster(&self) -> Result<Vec<SpecializationGroup>, FetchError>;
}

/// Which tier served a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Cache,
    Live,
    Fallback,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cache => "cache",
            Tier::Live => "live",
            Tier::Fallback => "fallback",
        }
    }
}

/// A resolved roster and the tier it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub tier: Tier,
    pub groups: Vec<SpecializationGroup>,
}

/// Non-fatal tier failures; they trigger fallthrough and are only logged
#[derive(Debug, Error)]
pub enum TierError {
    #[error("roster cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("upstream roster exhausted: {0}")]
    UpstreamExhausted(#[from] FetchError),

    #[error("live roster missed the {0:?} deadline")]
    DeadlineExceeded(Duration),
}

impl TierError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            TierError::CacheUnavailable(_) => "cache_unavailable",
            TierError::UpstreamExhausted(e) => e.kind(),
            TierError::DeadlineExceeded(_) => "deadline",
        }
    }
}

/// Cache → live → fallback roster resolver
pub struct TieredDataSource {
    cache: Arc<CacheBackend>,
    feed: Arc<dyn RosterFeed>,
}

impl TieredDataSource {
    pub fn new(cache: Arc<CacheBackend>, feed: Arc<dyn RosterFeed>) -> Self {
        Self { cache, feed }
    }

    /// Resolve the roster; never fails
    pub async fn resolve(&self) -> Resolution {
        self.resolve_with(None).await
    }

    /// Resolve the roster, giving the live tier at most `deadline` before
    /// degrading to the fallback
    pub async fn resolve_within(&self, deadline: Duration) -> Resolution {
        self.resolve_with(Some(deadline)).await
    }

    #[instrument(skip(self))]
    async fn resolve_with(&self, deadline: Option<Duration>) -> Resolution {
        match self.probe_cache().await {
            Ok(Some(groups)) => return self.resolved(Tier::Cache, groups),
            Ok(None) => debug!("Roster cache miss"),
            Err(e) => {
                warn!(error = %e, "Roster cache probe failed, degrading to live fetch");
                metrics::record_tier_failure(Tier::Cache, e.kind());
            }
        }

        match self.fetch_live(deadline).await {
            Ok(Some(groups)) => return self.resolved(Tier::Live, groups),
            Ok(None) => debug!("Live roster is empty"),
            Err(e) => {
                warn!(error = %e, "Live roster fetch failed, degrading to built-in roster");
                metrics::record_tier_failure(Tier::Live, e.kind());
            }
        }

        self.resolved(Tier::Fallback, fallback_roster())
    }

    async fn probe_cache(&self) -> Result<Option<Vec<SpecializationGroup>>, TierError> {
        let cached: Option<Vec<SpecializationGroup>> = self
            .cache
            .get(keys::ROSTER)
            .await
            .map_err(|e| TierError::CacheUnavailable(e.to_string()))?;
        Ok(cached.filter(|groups| !groups.is_empty()))
    }

    async fn fetch_live(
        &self,
        deadline: Option<Duration>,
    ) -> Result<Option<Vec<SpecializationGroup>>, TierError> {
        let groups = match deadline {
            Some(limit) => tokio::time::timeout(limit, self.feed.fetch_roster())
                .await
                .map_err(|_| TierError::DeadlineExceeded(limit))??,
            None => self.feed.fetch_roster().await?,
        };
        Ok(Some(groups).filter(|groups| !groups.is_empty()))
    }

    fn resolved(&self, tier: Tier, groups: Vec<SpecializationGroup>) -> Resolution {
        info!(tier = tier.as_str(), groups = groups.len(), "Roster resolved");
        metrics::record_resolution(tier);
        Resolution { tier, groups }
    }
}
