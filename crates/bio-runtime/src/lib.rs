#![deny(warnings)]

//! Calculation runtime: owns the live process configuration and publishes
//! self-consistent cost snapshots to the dashboards.

mod context;
mod scenario;
pub mod views;

#[cfg(test)]
mod testing;

pub use context::{
    CalculationContext, ContextSettings, Snapshot, SnapshotListener, SubscriptionId,
};
pub use scenario::Scenario;
