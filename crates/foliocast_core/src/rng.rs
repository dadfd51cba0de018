//! Standard-normal shock sources for path simulation.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of standard-normal draws feeding the path simulators.
///
/// The seam exists so tests can script an exact shock sequence and assert
/// exact path values; production uses [`GaussianRng`].
pub trait NormalSource {
    fn standard_normal(&mut self) -> f64;
}

/// Box–Muller transform over a uniform source.
#[derive(Debug, Clone)]
pub struct GaussianRng<R> {
    rng: R,
}

impl GaussianRng<SmallRng> {
    /// Seeded source for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// OS-seeded source for production runs.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl<R: Rng> GaussianRng<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NormalSource for GaussianRng<R> {
    fn standard_normal(&mut self) -> f64 {
        // Uniforms strictly in (0, 1): ln(0) is -inf, so redraw exact zeros.
        let mut u: f64 = self.rng.random();
        while u == 0.0 {
            u = self.rng.random();
        }
        let mut v: f64 = self.rng.random();
        while v == 0.0 {
            v = self.rng.random();
        }
        (-2.0 * u.ln()).sqrt() * (TAU * v).cos()
    }
}

/// Replays a fixed shock sequence, cycling when exhausted. An empty script
/// yields zeros.
#[derive(Debug, Clone)]
pub struct ScriptedNormals {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedNormals {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Every shock is zero: paths collapse to their deterministic drift.
    #[must_use]
    pub fn zeros() -> Self {
        Self::new(Vec::new())
    }
}

impl NormalSource for ScriptedNormals {
    fn standard_normal(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
