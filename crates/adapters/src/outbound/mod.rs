//! Outbound adapters.

pub mod identity;
pub mod persistence;
pub mod telemetry;
