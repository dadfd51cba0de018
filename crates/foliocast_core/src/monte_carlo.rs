//! Monte Carlo orchestration: drives many independent path simulations,
//! collects the cross-sectional distribution per month and at the horizon,
//! and reduces it to percentile bands.

use crate::error::SimulationError;
use crate::model::{MonteCarloResult, MonteCarloSummary, PercentileBand, SimulationParams};
use crate::path::{PathModel, select_model, simulate_aggregate_path, simulate_basket_path};
use crate::rng::NormalSource;

/// Completed trials between progress callbacks.
pub const PROGRESS_EVERY: usize = 250;

/// Linear-interpolation percentile of `values` at `p` in [0, 100].
///
/// `p` outside the range is clamped; an empty input yields 0.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let clamped = p.clamp(0.0, 100.0);
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let idx = (clamped / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = idx - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn band(values: &[f64]) -> PercentileBand {
    PercentileBand {
        p10: percentile(values, 10.0),
        p50: percentile(values, 50.0),
        p90: percentile(values, 90.0),
    }
}

/// Run `params.simulations` independent trials and aggregate them.
///
/// Blocking within the hosting execution unit: all trials run to completion
/// sequentially, with `on_progress(completed, total)` invoked after every
/// [`PROGRESS_EVERY`]th trial and not otherwise. This is the trust boundary
/// for parameter errors: validation happens up front and nothing past it
/// panics on malformed numbers.
pub fn run_monte_carlo<S: NormalSource + ?Sized>(
    params: &SimulationParams,
    source: &mut S,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<MonteCarloResult, SimulationError> {
    params.validate()?;

    let months = params.months as usize;
    let simulations = params.simulations;
    let model = select_model(params);

    let mut series_buckets: Vec<Vec<f64>> =
        (0..months).map(|_| Vec::with_capacity(simulations)).collect();
    let mut final_distribution = Vec::with_capacity(simulations);

    for trial in 0..simulations {
        let outcome = match model {
            PathModel::PerInstrument => simulate_basket_path(params, source),
            PathModel::Aggregate => simulate_aggregate_path(params, source),
        };

        final_distribution.push(outcome.final_value);
        for (month, bucket) in series_buckets.iter_mut().enumerate() {
            let value = outcome
                .series
                .get(month)
                .copied()
                .unwrap_or(outcome.final_value);
            bucket.push(value);
        }

        if (trial + 1) % PROGRESS_EVERY == 0 {
            on_progress(trial + 1, simulations);
        }
    }

    let series_percentiles: Vec<PercentileBand> =
        series_buckets.iter().map(|bucket| band(bucket)).collect();
    let nominal = band(&final_distribution);

    let inflation_factor = if params.annual_inflation == 0.0 {
        1.0
    } else {
        (1.0 + params.annual_inflation).powf(months as f64 / 12.0)
    };
    let real = if inflation_factor == 1.0 {
        nominal
    } else {
        let real_distribution: Vec<f64> = final_distribution
            .iter()
            .map(|value| value / inflation_factor)
            .collect();
        band(&real_distribution)
    };

    let probability_above_threshold = match params.threshold {
        Some(threshold) if simulations > 0 => {
            let above = final_distribution
                .iter()
                .filter(|value| **value >= threshold)
                .count();
            above as f64 / simulations as f64
        }
        _ => 0.0,
    };

    Ok(MonteCarloResult {
        final_distribution,
        series_percentiles,
        summary: MonteCarloSummary {
            nominal,
            real,
            probability_above_threshold,
        },
    })
}
