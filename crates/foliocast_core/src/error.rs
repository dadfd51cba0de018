use std::fmt;

/// Errors surfaced by the Monte Carlo orchestrator.
///
/// The orchestrator is the trust boundary: malformed parameters are caught
/// once per request and reported to the caller; they never panic inside a
/// trial. Data gaps (a missing correlation entry or a missing per-window
/// assumption) are silent defaults, not errors; see
/// [`crate::aggregate::has_missing_correlations`] for the advisory query.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A numeric parameter reached the simulator as NaN or infinity.
    NonFiniteParameter { field: &'static str, value: f64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::NonFiniteParameter { field, value } => {
                write!(f, "parameter `{field}` is not finite (got {value})")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
