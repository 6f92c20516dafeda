//! Brochure layout module
//!
//! Distributes the resolved roster over the brochure's printed columns.

pub mod balancer;

pub use balancer::{BalanceError, BalancerConfig, ColumnAssignment, ColumnBalancer};
