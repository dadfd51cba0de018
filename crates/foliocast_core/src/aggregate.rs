//! Assumption aggregation: turns per-instrument mu/sigma plus a pairwise
//! correlation table into statistics for a weighted basket.
//!
//! Pure functions over an injected [`AssumptionSet`]; no state is kept here.

use crate::model::{AssumptionSet, BasketMember, BasketStats};

/// Tolerance for basket weight validation.
pub const WEIGHT_TOLERANCE: f64 = 1e-4;

fn finite_or_zero(weight: f64) -> f64 {
    if weight.is_finite() { weight } else { 0.0 }
}

/// Normalize raw target weights to sum to 1.
///
/// A non-positive raw sum falls back to equal allocation across all members.
/// Non-finite entries are treated as 0 before summing.
#[must_use]
pub fn normalize_weights(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let cleaned: Vec<f64> = raw.iter().map(|w| finite_or_zero(*w)).collect();
    let sum: f64 = cleaned.iter().sum();
    if sum > 0.0 {
        cleaned.iter().map(|w| w / sum).collect()
    } else {
        vec![1.0 / raw.len() as f64; raw.len()]
    }
}

/// Whether raw weights already sum to 1 within `tolerance`.
/// An empty basket is valid.
#[must_use]
pub fn validate_weights(raw: &[f64], tolerance: f64) -> bool {
    if raw.is_empty() {
        return true;
    }
    let sum: f64 = raw.iter().map(|w| finite_or_zero(*w)).sum();
    (1.0 - sum).abs() <= tolerance
}

/// Weight-blended annual fee (TER) of a basket. 0 when the basket is empty
/// or carries no weight.
#[must_use]
pub fn weighted_fee(members: &[BasketMember]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let weight_sum: f64 = members.iter().map(|m| finite_or_zero(m.target_weight)).sum();
    if weight_sum == 0.0 {
        return 0.0;
    }
    let blended: f64 = members
        .iter()
        .map(|m| finite_or_zero(m.fee) * finite_or_zero(m.target_weight))
        .sum();
    blended / weight_sum
}

/// Aggregate a weighted basket into (mu, sigma, inflation) at one window.
///
/// Members without a defined assumption for the window are skipped, not
/// zero-filled. "Rate" members contribute to mu but never to variance. With
/// a single risky member the variance is just `w^2 * sigma^2`; with two or
/// more the full double sum over the correlation table applies, with missing
/// pairs treated as uncorrelated.
#[must_use]
pub fn aggregate_basket(
    set: &AssumptionSet,
    members: &[BasketMember],
    window: &str,
) -> BasketStats {
    let inflation = set.inflation(window);
    if members.is_empty() {
        return BasketStats {
            mu: 0.0,
            sigma: 0.0,
            inflation,
        };
    }

    let raw: Vec<f64> = members.iter().map(|m| m.target_weight).collect();
    let weights = normalize_weights(&raw);

    let mut mu = 0.0;
    for (member, weight) in members.iter().zip(&weights) {
        if let Some((member_mu, _)) = set.instrument_assumption(&member.id, window) {
            mu += weight * member_mu;
        }
    }

    let risky: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_risky())
        .map(|(index, _)| index)
        .collect();

    let mut variance = 0.0;
    if risky.len() == 1 {
        // A single risky asset has no cross terms.
        let index = risky[0];
        if let Some((_, sigma)) = set.instrument_assumption(&members[index].id, window) {
            variance = weights[index] * weights[index] * sigma * sigma;
        }
    } else {
        for &i in &risky {
            for &j in &risky {
                let Some((_, sigma_i)) = set.instrument_assumption(&members[i].id, window) else {
                    continue;
                };
                let Some((_, sigma_j)) = set.instrument_assumption(&members[j].id, window) else {
                    continue;
                };
                let corr = set.correlation(window, &members[i].id, &members[j].id);
                variance += weights[i] * weights[j] * sigma_i * sigma_j * corr;
            }
        }
    }

    BasketStats {
        mu,
        // Round-off in the double sum can dip a zero variance slightly negative.
        sigma: variance.max(0.0).sqrt(),
        inflation,
    }
}

/// Whether any unordered pair of risky members lacks a correlation entry in
/// either direction at `window`.
///
/// Advisory only: the aggregation defaults missing pairs to 0 rather than
/// failing; callers use this to warn.
#[must_use]
pub fn has_missing_correlations(
    set: &AssumptionSet,
    members: &[BasketMember],
    window: &str,
) -> bool {
    let risky: Vec<&BasketMember> = members.iter().filter(|m| m.is_risky()).collect();
    for i in 0..risky.len() {
        for j in (i + 1)..risky.len() {
            if !set.has_correlation_entry(window, &risky[i].id, &risky[j].id) {
                return true;
            }
        }
    }
    false
}
