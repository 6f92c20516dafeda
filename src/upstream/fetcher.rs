//! Single-attempt JSON fetcher
//!
//! Issues one logical GET against an upstream endpoint. Redirects are
//! followed by hand (reqwest's own redirect policy is disabled) so the hop
//! limit and the relative `Location` resolution are ours. The timeout bounds
//! the whole attempt, redirects included. There are no retries here; fallback
//! policy belongs to the roster source.

use std::time::Duration;

use reqwest::{header::LOCATION, redirect::Policy, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

/// Maximum number of redirects followed before giving up
pub const MAX_REDIRECTS: u32 = 5;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors produced by a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid upstream url {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("more than {0} redirects")]
    TooManyRedirects(u32),

    #[error("response body is not valid JSON: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Network(_) => "network",
            FetchError::Timeout(_) => "timeout",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::TooManyRedirects(_) => "too_many_redirects",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Fetcher settings
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    /// Append a `t=<unix millis>` query parameter so intermediaries never
    /// serve a stale sheet
    pub cache_bust: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cache_bust: true,
        }
    }
}

/// Single-attempt JSON fetcher with bounded redirect following
pub struct ResilientFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl ResilientFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client, config })
    }

    /// GET `url` and decode the body as JSON
    #[instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = Url::parse(url).map_err(|e| {
            error!(error = %e, "Rejecting unparseable upstream url");
            FetchError::InvalidUrl(format!("{url}: {e}"))
        })?;

        match tokio::time::timeout(self.config.timeout, self.follow(url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.config.timeout.as_millis() as u64, "Upstream fetch timed out");
                Err(FetchError::Timeout(self.config.timeout))
            }
        }
    }

    async fn follow<T: DeserializeOwned>(&self, mut url: Url) -> Result<T, FetchError> {
        let mut redirects: u32 = 0;

        loop {
            let response = self.client.get(self.request_url(&url)).send().await?;
            let status = response.status();
            debug!(url = %url, status = %status, "Upstream response status");

            if is_followed_redirect(status) {
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    warn!(redirects, "Redirect limit exceeded");
                    return Err(FetchError::TooManyRedirects(MAX_REDIRECTS));
                }

                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| {
                        warn!(status = %status, "Redirect without a usable Location header");
                        FetchError::HttpStatus(status.as_u16())
                    })?;
                url = url
                    .join(location)
                    .map_err(|_| FetchError::HttpStatus(status.as_u16()))?;

                debug!(url = %url, redirects, "Following redirect");
                continue;
            }

            if !status.is_success() {
                warn!(status = %status, "Upstream request failed");
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| {
                error!(error = %e, body_len = body.len(), "Failed to parse upstream response");
                FetchError::Parse(e.to_string())
            });
        }
    }

    /// The URL actually requested; redirects resolve against the unbusted one
    fn request_url(&self, url: &Url) -> Url {
        if !self.config.cache_bust {
            return url.clone();
        }
        let mut busted = url.clone();
        busted
            .query_pairs_mut()
            .append_pair("t", &chrono::Utc::now().timestamp_millis().to_string());
        busted
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT
    )
}
