//! Hiperfaturômetro: a scoring engine that combines independent suspicion
//! signals into a single weighted risk score for public procurement bids.
//!
//! The crate is split between the pure [`analysis`] core (signal evaluators,
//! aggregation, classification) and the ambient service plumbing (config,
//! telemetry, error surface) consumed by the HTTP service in `services/api`.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
