mod assumptions;
mod params;
mod results;

pub use assumptions::{
    AssumptionDefaults, AssumptionSet, BasketMember, BasketStats, InstrumentAssumption,
};
pub use params::{Behavior, InstrumentSpec, SimulationParams};
pub use results::{MonteCarloResult, MonteCarloSummary, PathOutcome, PercentileBand};
