use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::Behavior;

/// Inflation assumption used when a window has no entry.
const DEFAULT_INFLATION: f64 = 0.02;
/// Horizon window used when the data set does not name one.
const DEFAULT_WINDOW: &str = "10Y";

/// Historical return assumptions for one instrument, keyed by horizon window
/// (e.g. "3Y", "10Y"). A (mu, sigma) pair exists for a window only when both
/// maps carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentAssumption {
    #[serde(default)]
    pub label: Option<String>,
    pub mu: FxHashMap<String, f64>,
    pub sigma: FxHashMap<String, f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Window-level defaults shipped with an assumption set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionDefaults {
    #[serde(default)]
    pub inflation: FxHashMap<String, f64>,
    #[serde(default)]
    pub selected_window: String,
}

/// Reference data backing the assumption aggregator: per-instrument mu/sigma
/// tables plus a pairwise correlation table per window.
///
/// Loaded once and read-only for the process lifetime. Passed explicitly to
/// the aggregation functions rather than held as ambient global state, so
/// tests can inject synthetic tables.
///
/// The correlation table is possibly one-directional: consumers must check
/// both (a, b) and (b, a) before defaulting to 0. The diagonal is implicit
/// and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionSet {
    #[serde(default)]
    pub version: u32,
    /// Date the assumption data was snapshotted.
    pub as_of: Date,
    #[serde(default)]
    pub defaults: AssumptionDefaults,
    /// window -> instrument -> instrument -> correlation in [-1, 1].
    #[serde(default)]
    pub correlations: FxHashMap<String, FxHashMap<String, FxHashMap<String, f64>>>,
    #[serde(default)]
    pub instruments: FxHashMap<String, InstrumentAssumption>,
}

impl AssumptionSet {
    /// The horizon window this data set considers current.
    #[must_use]
    pub fn selected_window(&self) -> &str {
        if self.defaults.selected_window.is_empty() {
            DEFAULT_WINDOW
        } else {
            &self.defaults.selected_window
        }
    }

    /// Annual inflation assumption for a window.
    #[must_use]
    pub fn inflation(&self, window: &str) -> f64 {
        self.defaults
            .inflation
            .get(window)
            .copied()
            .unwrap_or(DEFAULT_INFLATION)
    }

    /// (mu, sigma) for an instrument at a window, if both are defined.
    #[must_use]
    pub fn instrument_assumption(&self, id: &str, window: &str) -> Option<(f64, f64)> {
        let instrument = self.instruments.get(id)?;
        let mu = instrument.mu.get(window)?;
        let sigma = instrument.sigma.get(window)?;
        Some((*mu, *sigma))
    }

    /// Pairwise correlation at a window. Self-correlation is always 1;
    /// missing pairs default to 0 (uncorrelated), not an error.
    #[must_use]
    pub fn correlation(&self, window: &str, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let Some(map) = self.correlations.get(window) else {
            return 0.0;
        };
        if let Some(direct) = map.get(a).and_then(|row| row.get(b)) {
            return *direct;
        }
        if let Some(reverse) = map.get(b).and_then(|row| row.get(a)) {
            return *reverse;
        }
        0.0
    }

    /// Whether the table carries an entry for (a, b) in either direction.
    #[must_use]
    pub fn has_correlation_entry(&self, window: &str, a: &str, b: &str) -> bool {
        let Some(map) = self.correlations.get(window) else {
            return false;
        };
        map.get(a).is_some_and(|row| row.contains_key(b))
            || map.get(b).is_some_and(|row| row.contains_key(a))
    }
}

/// A basket entry as seen by the aggregator: identity, target weight, and
/// how the instrument behaves under simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketMember {
    pub id: String,
    #[serde(default)]
    pub target_weight: f64,
    /// Annual fee (TER) of this member, fractional.
    #[serde(default)]
    pub fee: f64,
    #[serde(default)]
    pub behavior: Behavior,
}

impl BasketMember {
    /// Deterministic members never contribute to basket variance.
    #[must_use]
    pub fn is_risky(&self) -> bool {
        self.behavior != Behavior::Rate
    }
}

/// Aggregate statistics for a weighted basket at one horizon window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasketStats {
    /// Weighted expected annual return.
    pub mu: f64,
    /// Correlation-aware annual volatility.
    pub sigma: f64,
    /// Annual inflation assumption for the window.
    pub inflation: f64,
}
