//! Upstream integration module
//!
//! Fetcher and client for the spreadsheet-backed roster and leave endpoints.

pub mod client;
pub mod fetcher;
pub mod models;

pub use client::UpstreamClient;
pub use fetcher::{FetchError, FetcherConfig, ResilientFetcher, DEFAULT_TIMEOUT, MAX_REDIRECTS};
pub use models::{LeaveRecord, RosterPayload};
