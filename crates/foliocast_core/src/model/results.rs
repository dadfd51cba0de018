use serde::{Deserialize, Serialize};

/// Cross-sectional percentile band at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Horizon-level summary of a Monte Carlo run.
///
/// `real` is the nominal band deflated by cumulative inflation over the
/// simulated horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloSummary {
    pub nominal: PercentileBand,
    pub real: PercentileBand,
    pub probability_above_threshold: f64,
}

/// Full result handed back for one request. The engine keeps no history;
/// this is produced once and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    /// Horizon value of every trial, in trial order (unsorted).
    pub final_distribution: Vec<f64>,
    /// Per-month p10/p50/p90 across all trials.
    pub series_percentiles: Vec<PercentileBand>,
    pub summary: MonteCarloSummary,
}

/// One simulated trajectory: the monthly value series and its horizon value.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOutcome {
    pub series: Vec<f64>,
    pub final_value: f64,
}
