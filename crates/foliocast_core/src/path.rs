//! Trajectory generators: one simulated monthly value series per call.
//!
//! Two interchangeable models exist. The aggregate model treats the whole
//! basket as a single lognormal process parameterized by basket-level
//! mu/sigma (computed upstream by [`crate::aggregate`]). The per-instrument
//! model simulates each member separately so deterministic "rate" legs stay
//! free of stochastic noise, with optional annual rebalancing back to target
//! weights. Instrument shocks in the per-instrument model are drawn
//! independently; correlation enters only through the aggregate model's
//! sigma.

use crate::aggregate::normalize_weights;
use crate::model::{Behavior, PathOutcome, SimulationParams};
use crate::rng::NormalSource;

/// Which trajectory generator a parameter set calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathModel {
    /// Single lognormal process over the whole basket.
    Aggregate,
    /// Per-instrument ensemble with deterministic rate legs.
    PerInstrument,
}

/// Model selection policy.
///
/// The per-instrument model is used only when an instrument list is present
/// AND at least one member is a deterministic "rate" leg. A basket of purely
/// stochastic instruments is already well approximated by its
/// correlation-aware aggregate sigma, so it takes the cheaper single-process
/// path even when the list is present.
#[must_use]
pub fn select_model(params: &SimulationParams) -> PathModel {
    let has_rate_leg = params
        .instruments
        .iter()
        .any(|i| i.behavior == Behavior::Rate);
    if !params.instruments.is_empty() && has_rate_leg {
        PathModel::PerInstrument
    } else {
        PathModel::Aggregate
    }
}

/// Simulate the basket as one lognormal (GBM) process.
///
/// The drift term `monthly_return - vol^2/2` preserves the arithmetic mean
/// of the monthly return under the lognormal discretization. Contributions
/// land before growth; the fee is applied after.
pub fn simulate_aggregate_path<S: NormalSource + ?Sized>(
    params: &SimulationParams,
    source: &mut S,
) -> PathOutcome {
    let monthly_return = params.annual_return / 12.0;
    let monthly_vol = params.annual_volatility / 12.0_f64.sqrt();
    let monthly_fee = params.annual_fee / 12.0;

    let mut series = Vec::with_capacity(params.months as usize);
    let mut value = params.initial_capital;

    for _ in 0..params.months {
        let shock = source.standard_normal();
        let growth =
            ((monthly_return - 0.5 * monthly_vol * monthly_vol) + monthly_vol * shock).exp();
        value = (value + params.monthly_contribution) * growth;
        value *= 1.0 - monthly_fee;
        series.push(value);
    }

    PathOutcome {
        final_value: value,
        series,
    }
}

/// Simulate each instrument separately.
///
/// Weights come from each member's target weight with the equal-weight
/// fallback. Rate legs compound deterministically at `mu * dt`; risky legs
/// draw an independent shock each. The basket-level monthly fee applies to
/// every leg. When `rebalance_annual` is set, each 12th month-end
/// redistributes the summed value back to target weights.
pub fn simulate_basket_path<S: NormalSource + ?Sized>(
    params: &SimulationParams,
    source: &mut S,
) -> PathOutcome {
    let instruments = &params.instruments;
    let dt = 1.0 / 12.0;
    let monthly_fee = params.annual_fee / 12.0;

    let raw: Vec<f64> = instruments.iter().map(|i| i.target_weight).collect();
    let weights = normalize_weights(&raw);

    let mut values: Vec<f64> = weights
        .iter()
        .map(|w| params.initial_capital * w)
        .collect();
    let mut series = Vec::with_capacity(params.months as usize);

    for month in 0..params.months {
        for (index, instrument) in instruments.iter().enumerate() {
            let base = values[index] + params.monthly_contribution * weights[index];
            values[index] = match instrument.behavior {
                Behavior::Rate => base * (1.0 + instrument.mu * dt),
                Behavior::Risky => {
                    let shock = source.standard_normal();
                    let drift = (instrument.mu - 0.5 * instrument.sigma * instrument.sigma) * dt;
                    let diffusion = instrument.sigma * dt.sqrt() * shock;
                    base * (drift + diffusion).exp()
                }
            };
            values[index] *= 1.0 - monthly_fee;
        }

        if params.rebalance_annual && (month + 1) % 12 == 0 {
            let total: f64 = values.iter().sum();
            for (value, weight) in values.iter_mut().zip(&weights) {
                *value = total * weight;
            }
        }

        series.push(values.iter().sum());
    }

    PathOutcome {
        final_value: series.last().copied().unwrap_or(0.0),
        series,
    }
}
