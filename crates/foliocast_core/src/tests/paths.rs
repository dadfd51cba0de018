//! Tests for the trajectory generators
//!
//! These tests verify that:
//! - The aggregate model follows the lognormal discretization exactly
//! - Rate legs compound deterministically while risky legs grow lognormally
//! - Contributions and fees land in the documented order
//! - Annual rebalancing resets instrument values to target weights
//! - The model selection policy picks per-instrument only for rate legs

use crate::model::{Behavior, InstrumentSpec, SimulationParams};
use crate::path::{
    PathModel, select_model, simulate_aggregate_path, simulate_basket_path,
};
use crate::rng::{NormalSource, ScriptedNormals};

fn aggregate_params(months: u32) -> SimulationParams {
    SimulationParams {
        initial_capital: 1_000.0,
        annual_return: 0.12,
        months,
        simulations: 1,
        ..Default::default()
    }
}

fn instrument(id: &str, mu: f64, sigma: f64, weight: f64, behavior: Behavior) -> InstrumentSpec {
    InstrumentSpec {
        id: id.to_string(),
        mu,
        sigma,
        target_weight: weight,
        behavior,
    }
}

#[test]
fn test_aggregate_path_zero_vol_is_pure_drift() {
    let params = aggregate_params(12);
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_aggregate_path(&params, &mut source);

    // Twelve months of exp(0.01) compound to exactly exp(0.12).
    let expected = 1_000.0 * f64::exp(0.12);
    assert_eq!(outcome.series.len(), 12);
    assert!((outcome.final_value - expected).abs() < 1e-9);
    assert!((outcome.series[0] - 1_000.0 * f64::exp(0.01)).abs() < 1e-9);
    assert_eq!(outcome.final_value, outcome.series[11]);
}

#[test]
fn test_aggregate_path_scripted_shock() {
    let params = SimulationParams {
        initial_capital: 1_000.0,
        monthly_contribution: 100.0,
        annual_return: 0.12,
        annual_volatility: 0.12,
        annual_fee: 0.012,
        months: 1,
        simulations: 1,
        ..Default::default()
    };
    let mut source = ScriptedNormals::new(vec![1.5]);
    let outcome = simulate_aggregate_path(&params, &mut source);

    let monthly_vol = 0.12 / 12.0_f64.sqrt();
    let growth = ((0.01 - 0.5 * monthly_vol * monthly_vol) + monthly_vol * 1.5).exp();
    let expected = (1_000.0 + 100.0) * growth * (1.0 - 0.001);
    assert!((outcome.final_value - expected).abs() < 1e-9);
}

#[test]
fn test_aggregate_path_fee_applied_after_growth() {
    let params = SimulationParams {
        initial_capital: 1_000.0,
        annual_fee: 0.012,
        months: 2,
        simulations: 1,
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_aggregate_path(&params, &mut source);
    assert!((outcome.final_value - 1_000.0 * 0.999 * 0.999).abs() < 1e-9);
}

#[test]
fn test_aggregate_path_zero_months() {
    let params = aggregate_params(0);
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_aggregate_path(&params, &mut source);
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.final_value, 1_000.0);
}

#[test]
fn test_basket_rate_leg_compounds_linearly() {
    let params = SimulationParams {
        initial_capital: 1_200.0,
        months: 3,
        simulations: 1,
        instruments: vec![instrument("cash", 0.12, 0.0, 1.0, Behavior::Rate)],
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_basket_path(&params, &mut source);
    // Simple monthly compounding at mu * dt, no lognormal term.
    assert!((outcome.final_value - 1_200.0 * 1.01_f64.powi(3)).abs() < 1e-9);
}

#[test]
fn test_basket_mixed_legs_grow_differently() {
    // Same mu, zero sigma: the risky leg grows exp(mu*dt) per month, the
    // rate leg (1 + mu*dt). They must not collapse to the same series.
    let params = SimulationParams {
        initial_capital: 1_000.0,
        months: 12,
        simulations: 1,
        instruments: vec![
            instrument("bond", 0.12, 0.0, 0.5, Behavior::Rate),
            instrument("stock", 0.12, 0.0, 0.5, Behavior::Risky),
        ],
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_basket_path(&params, &mut source);

    let expected = 500.0 * 1.01_f64.powi(12) + 500.0 * f64::exp(0.12);
    assert!((outcome.final_value - expected).abs() < 1e-9);
}

#[test]
fn test_basket_contribution_split_by_weight() {
    let params = SimulationParams {
        initial_capital: 1_000.0,
        monthly_contribution: 100.0,
        months: 6,
        simulations: 1,
        instruments: vec![
            instrument("a", 0.0, 0.0, 0.75, Behavior::Rate),
            instrument("b", 0.0, 0.0, 0.25, Behavior::Rate),
        ],
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_basket_path(&params, &mut source);
    // mu = 0 and no fee: the basket just accumulates contributions.
    assert!((outcome.series[0] - 1_100.0).abs() < 1e-9);
    assert!((outcome.final_value - 1_600.0).abs() < 1e-9);
}

#[test]
fn test_basket_equal_weight_fallback() {
    let params = SimulationParams {
        initial_capital: 1_000.0,
        months: 1,
        simulations: 1,
        instruments: vec![
            instrument("growing", 0.12, 0.0, 0.0, Behavior::Rate),
            instrument("flat", 0.0, 0.0, 0.0, Behavior::Rate),
        ],
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_basket_path(&params, &mut source);
    // Zero weights split the capital evenly.
    assert!((outcome.final_value - (500.0 * 1.01 + 500.0)).abs() < 1e-9);
}

#[test]
fn test_basket_annual_rebalance_resets_target_weights() {
    let rebalanced = SimulationParams {
        initial_capital: 1_000.0,
        months: 24,
        simulations: 1,
        rebalance_annual: true,
        instruments: vec![
            instrument("growing", 0.12, 0.0, 0.5, Behavior::Rate),
            instrument("flat", 0.0, 0.0, 0.5, Behavior::Risky),
        ],
        ..Default::default()
    };
    let drifting = SimulationParams {
        rebalance_annual: false,
        ..rebalanced.clone()
    };

    let growth = 1.01_f64.powi(12);
    let mut source = ScriptedNormals::zeros();
    let rebalanced_outcome = simulate_basket_path(&rebalanced, &mut source);

    // At the 12-month boundary each leg is reset to half the total, so the
    // second year repeats the first year's growth on the rebalanced split.
    let year_one_total = 500.0 * (growth + 1.0);
    let expected = (year_one_total / 2.0) * (growth + 1.0);
    assert!((rebalanced_outcome.final_value - expected).abs() < 1e-6);

    // Rebalancing moves value between legs without changing the total.
    assert!((rebalanced_outcome.series[11] - year_one_total).abs() < 1e-6);

    let mut source = ScriptedNormals::zeros();
    let drifting_outcome = simulate_basket_path(&drifting, &mut source);
    assert!((drifting_outcome.series[11] - year_one_total).abs() < 1e-6);
    let drifting_expected = 500.0 * growth * growth + 500.0;
    assert!((drifting_outcome.final_value - drifting_expected).abs() < 1e-6);
    // Rebalancing keeps feeding the flat leg, so it trails the drifted basket.
    assert!(rebalanced_outcome.final_value < drifting_outcome.final_value);
}

#[test]
fn test_basket_zero_months() {
    let params = SimulationParams {
        initial_capital: 1_000.0,
        months: 0,
        simulations: 1,
        instruments: vec![instrument("cash", 0.03, 0.0, 1.0, Behavior::Rate)],
        ..Default::default()
    };
    let mut source = ScriptedNormals::zeros();
    let outcome = simulate_basket_path(&params, &mut source);
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.final_value, 0.0);
}

#[test]
fn test_select_model_policy() {
    // No instrument list: aggregate.
    assert_eq!(select_model(&aggregate_params(12)), PathModel::Aggregate);

    // All-risky list: still aggregate, the correlation-aware sigma upstream
    // already covers it.
    let all_risky = SimulationParams {
        instruments: vec![
            instrument("a", 0.07, 0.15, 0.5, Behavior::Risky),
            instrument("b", 0.05, 0.1, 0.5, Behavior::Risky),
        ],
        ..aggregate_params(12)
    };
    assert_eq!(select_model(&all_risky), PathModel::Aggregate);

    // Any rate leg forces the per-instrument model.
    let mixed = SimulationParams {
        instruments: vec![
            instrument("a", 0.07, 0.15, 0.5, Behavior::Risky),
            instrument("cash", 0.03, 0.0, 0.5, Behavior::Rate),
        ],
        ..aggregate_params(12)
    };
    assert_eq!(select_model(&mixed), PathModel::PerInstrument);
}

#[test]
fn test_scripted_source_cycles() {
    let mut source = ScriptedNormals::new(vec![1.0, -1.0]);
    assert_eq!(source.standard_normal(), 1.0);
    assert_eq!(source.standard_normal(), -1.0);
    assert_eq!(source.standard_normal(), 1.0);
}
