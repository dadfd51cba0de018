//! Stochastic portfolio projection library
//!
//! This crate provides the Monte Carlo engine behind portfolio outcome
//! projections. It supports:
//! - Aggregating per-instrument return assumptions (mu/sigma per horizon
//!   window) plus a pairwise correlation table into basket-level statistics
//! - Lognormal (GBM) path simulation of a whole basket, or per-instrument
//!   simulation with deterministic "rate" legs and annual rebalancing
//! - Monte Carlo orchestration over thousands of trials with percentile
//!   bands, inflation-adjusted summaries, and threshold probabilities
//! - A seedable standard-normal source so tests can script exact shocks
//!
//! The engine is pure: no threads, no I/O, deterministic given an injected
//! [`rng::NormalSource`]. Background execution lives in the host crate.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod error;
pub mod monte_carlo;
pub mod path;
pub mod rng;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use aggregate::{
    WEIGHT_TOLERANCE, aggregate_basket, has_missing_correlations, normalize_weights,
    validate_weights, weighted_fee,
};
pub use monte_carlo::{PROGRESS_EVERY, percentile, run_monte_carlo};
