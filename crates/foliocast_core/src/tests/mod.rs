//! Integration tests for the foliocast projection engine
//!
//! Tests are organized by topic:
//! - `weights` - Weight normalization, validation, and fee blending
//! - `aggregation` - Basket-level mu/sigma aggregation and correlation lookup
//! - `percentiles` - Linear-interpolation percentile computation
//! - `paths` - Aggregate and per-instrument trajectory generators
//! - `monte_carlo` - Orchestration, progress cadence, summaries, errors

mod paths;
mod percentiles;
