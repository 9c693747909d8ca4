#![deny(warnings)]

//! Cost models for bioreactor processes.
//!
//! This crate provides validated calculators for:
//! - Annual cost breakdown across seven categories and per-kg COGS
//! - Labor sensitivity tables over relative staffing-level deltas

mod breakdown;
mod sensitivity;

#[cfg(test)]
pub(crate) mod fixtures;

pub use breakdown::{compute_breakdown, labor_cost, CostBreakdown, CostCategory};
pub use sensitivity::{
    compute_labor_sensitivity, compute_labor_sensitivity_with, select_current_percentage,
    CurrentPercentagePolicy, LaborLever, LaborScenario, LaborSensitivityTable,
    SensitivityOptions, DEFAULT_DELTAS,
};

use bio_core::ValidationError;
use thiserror::Error;

/// Why a delta set was refused by the sensitivity analyzer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioSetIssue {
    #[error("no deltas supplied")]
    Empty,
    #[error("delta {0}% appears more than once")]
    Duplicate(i32),
    /// Staffing cannot drop below zero.
    #[error("delta {0}% is below -100%")]
    BelowFloor(i32),
}

/// Errors produced by the cost calculators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CostError {
    /// A required numeric field is negative, out of range, or (for output
    /// mass) non-positive. Raised before any division.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),
    /// The delta sequence is empty, repeats a value, or drops below -100%.
    #[error("invalid scenario set: {0}")]
    InvalidScenarioSet(ScenarioSetIssue),
}
