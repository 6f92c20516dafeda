//! Roster module
//!
//! Doctor/schedule model, the built-in fallback roster, tiered resolution and
//! the cache warmer that feeds it.

pub mod fallback;
pub mod model;
pub mod source;
pub mod warmer;

pub use fallback::fallback_roster;
pub use model::{total_doctors, Day, Doctor, Schedule, SpecializationGroup};
pub use source::{Resolution, RosterFeed, Tier, TierError, TieredDataSource};
pub use warmer::CacheWarmer;
