//! Column balancing for the brochure
//!
//! Packs specialization groups into a fixed number of columns so each
//! column's estimated rendered height is close to the others. Height is
//! modelled as a weight: one header per group plus one row per doctor.
//!
//! The pass is greedy and left to right. A group that would overshoot the
//! current column's target by more than the slack is split: the head goes
//! into the remaining space, the tail becomes a continuation group at the top
//! of the next column. A group is split at most once, and the last column
//! takes whatever is left, so an oversized roster overflows instead of
//! looping.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::roster::SpecializationGroup;

/// Weight of a specialization header
pub const DEFAULT_HEADER_WEIGHT: u32 = 15;
/// Weight of a single doctor row
pub const DEFAULT_DOCTOR_WEIGHT: u32 = 35;
/// How far past the target a column may grow before a group is split
pub const DEFAULT_SLACK: u32 = 20;
/// Appended to the title of a continuation group
pub const DEFAULT_CONTINUATION_SUFFIX: &str = " (continued)";

/// Weight model and split tolerance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancerConfig {
    pub header_weight: u32,
    pub doctor_weight: u32,
    pub slack: u32,
    pub continuation_suffix: String,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            header_weight: DEFAULT_HEADER_WEIGHT,
            doctor_weight: DEFAULT_DOCTOR_WEIGHT,
            slack: DEFAULT_SLACK,
            continuation_suffix: DEFAULT_CONTINUATION_SUFFIX.to_string(),
        }
    }
}

/// Groups placed in one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAssignment {
    pub column_index: usize,
    pub weight: u64,
    pub groups: Vec<SpecializationGroup>,
}

impl ColumnAssignment {
    fn empty(column_index: usize) -> Self {
        Self {
            column_index,
            weight: 0,
            groups: Vec::new(),
        }
    }

    fn push(&mut self, group: SpecializationGroup, weight: u64) {
        self.weight += weight;
        self.groups.push(group);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("column count must be at least 1")]
    NoColumns,
}

/// Weighted greedy column balancer
#[derive(Debug, Clone, Default)]
pub struct ColumnBalancer {
    config: BalancerConfig,
}

impl ColumnBalancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }


    /// Weight of a group with `doctors` rows
    pub fn weight_for(&self, doctors: usize) -> u64 {
        u64::from(self.config.header_weight) + doctors as u64 * u64::from(self.config.doctor_weight)
    }

    pub fn weight_of(&self, group: &SpecializationGroup) -> u64 {
        self.weight_for(group.doctor_count())
    }

    /// Distribute `groups` over `column_count` columns
    ///
    /// Always returns exactly `column_count` assignments, some possibly
    /// empty. Every doctor appears exactly once, in input order.
    pub fn distribute(
        &self,
        groups: Vec<SpecializationGroup>,
        column_count: usize,
    ) -> Result<Vec<ColumnAssignment>, BalanceError> {
        if column_count == 0 {
            return Err(BalanceError::NoColumns);
        }

        let mut columns: Vec<ColumnAssignment> =
            (0..column_count).map(ColumnAssignment::empty).collect();
        if groups.is_empty() {
            return Ok(columns);
        }

        let total: u64 = groups.iter().map(|g| self.weight_of(g)).sum();
        let target = total.div_ceil(column_count as u64);
        let slack = u64::from(self.config.slack);
        let header = u64::from(self.config.header_weight);
        let doctor = u64::from(self.config.doctor_weight);
        let last = column_count - 1;

        debug!(total, target, column_count, "Balancing roster into columns");

        let mut current = 0;
        for group in groups {
            let weight = self.weight_of(&group);

            if current == last || columns[current].weight + weight <= target + slack {
                columns[current].push(group, weight);
                continue;
            }

            let remaining = target.saturating_sub(columns[current].weight);
            if remaining < header + doctor {
                current += 1;
                columns[current].push(group, weight);
                continue;
            }

            let fit = (remaining - header)
                .checked_div(doctor)
                .map_or(group.doctor_count(), |n| n as usize)
                .max(1);
            let (head, tail) = self.split(group, fit);

            let head_weight = self.weight_of(&head);
            columns[current].push(head, head_weight);
            current += 1;

            if let Some(tail) = tail {
                let tail_weight = self.weight_of(&tail);
                columns[current].push(tail, tail_weight);
            }
        }

        Ok(columns)
    }

    /// Split after the first `at` doctors; the tail is `None` when nothing
    /// is left over
    fn split(
        &self,
        mut group: SpecializationGroup,
        at: usize,
    ) -> (SpecializationGroup, Option<SpecializationGroup>) {
        if at >= group.doctors.len() {
            return (group, None);
        }

        let rest = group.doctors.split_off(at);
        let tail = SpecializationGroup {
            title: format!("{}{}", group.title, self.config.continuation_suffix),
            doctors: rest,
            continued: true,
        };
        (group, Some(tail))
    }
}
