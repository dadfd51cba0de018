//! Host layer for the foliocast projection engine.
//!
//! Wraps the pure engine from `foliocast_core` in a persistent background
//! worker with a request/progress/result message protocol, and exposes a
//! promise-like [`engine::ProjectionEngine`] API to callers.

#![warn(clippy::all)]

pub mod engine;
pub mod logging;
pub mod worker;

pub use engine::{ProgressSubscription, ProjectionEngine, RunError, RunHandle, RunProgress};
pub use logging::init_logging;
