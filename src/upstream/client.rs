//! Upstream sheet client
//!
//! Knows the roster and leave endpoints and decodes their payloads through
//! the resilient fetcher.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    roster::{RosterFeed, SpecializationGroup},
    upstream::{
        fetcher::{FetchError, ResilientFetcher},
        models::{LeaveRecord, RosterPayload},
    },
};

/// Client for the spreadsheet-backed upstream endpoints
pub struct UpstreamClient {
    fetcher: ResilientFetcher,
    roster_url: String,
    leave_url: Option<String>,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(fetcher: ResilientFetcher, config: &Config) -> Self {
        Self {
            fetcher,
            roster_url: config.roster_api_url.clone(),
            leave_url: config.leave_api_url.clone(),
        }
    }

    /// Fetch leave records; `None` when no leave endpoint is configured
    #[instrument(skip(self))]
    pub async fn fetch_leave(&self) -> Result<Option<Vec<LeaveRecord>>, FetchError> {
        let Some(url) = self.leave_url.as_deref() else {
            return Ok(None);
        };

        let records: Vec<Option<LeaveRecord>> = self.fetcher.fetch(url).await?;
        let records: Vec<LeaveRecord> = records.into_iter().flatten().collect();

        debug!(records = records.len(), "Fetched leave records");
        Ok(Some(records))
    }
}

#[async_trait]
impl RosterFeed for UpstreamClient {
    #[instrument(skip(self))]
    async fn fetch_roster(&self) -> Result<Vec<SpecializationGroup>, FetchError> {
        let RosterPayload(groups) = self.fetcher.fetch(&self.roster_url).await?;
        debug!(groups = groups.len(), "Fetched live roster");
        Ok(groups)
    }
}
