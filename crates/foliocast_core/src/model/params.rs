use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// How an instrument evolves during path simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// Stochastic lognormal leg driven by an independent normal shock each month.
    #[default]
    Risky,
    /// Deterministic leg compounded at mu each month, no shock.
    Rate,
}

/// One basket member carried inside [`SimulationParams`].
///
/// Self-contained: mu/sigma are already resolved for the chosen horizon
/// window, so the simulator never looks anything up at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSpec {
    pub id: String,
    /// Expected annual return (fractional, 0.07 = 7%).
    pub mu: f64,
    /// Annual volatility (fractional).
    pub sigma: f64,
    #[serde(default)]
    pub target_weight: f64,
    #[serde(default)]
    pub behavior: Behavior,
}

fn default_simulations() -> usize {
    5_000
}

/// The single value object that crosses the worker boundary.
///
/// All rates are fractional per annum; `threshold` and monetary fields share
/// the currency unit of `initial_capital`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub initial_capital: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub annual_return: f64,
    #[serde(default)]
    pub annual_volatility: f64,
    #[serde(default)]
    pub annual_fee: f64,
    pub months: u32,
    #[serde(default = "default_simulations")]
    pub simulations: usize,
    #[serde(default)]
    pub annual_inflation: f64,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub instruments: Vec<InstrumentSpec>,
    #[serde(default)]
    pub rebalance_annual: bool,
}

impl SimulationParams {
    /// Check every numeric field for NaN/infinity.
    ///
    /// Called once per request at the orchestrator boundary; nothing past it
    /// is allowed to panic on malformed numbers.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let scalars = [
            ("initialCapital", self.initial_capital),
            ("monthlyContribution", self.monthly_contribution),
            ("annualReturn", self.annual_return),
            ("annualVolatility", self.annual_volatility),
            ("annualFee", self.annual_fee),
            ("annualInflation", self.annual_inflation),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteParameter { field, value });
            }
        }

        if let Some(threshold) = self.threshold
            && !threshold.is_finite()
        {
            return Err(SimulationError::NonFiniteParameter {
                field: "threshold",
                value: threshold,
            });
        }

        for instrument in &self.instruments {
            let fields = [
                ("instruments.mu", instrument.mu),
                ("instruments.sigma", instrument.sigma),
                ("instruments.targetWeight", instrument.target_weight),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(SimulationError::NonFiniteParameter { field, value });
                }
            }
        }

        Ok(())
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_capital: 0.0,
            monthly_contribution: 0.0,
            annual_return: 0.0,
            annual_volatility: 0.0,
            annual_fee: 0.0,
            months: 0,
            simulations: default_simulations(),
            annual_inflation: 0.0,
            threshold: None,
            instruments: Vec::new(),
            rebalance_annual: false,
        }
    }
}
