use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while validating input or running the simulation pipeline.
///
/// Validation errors are scoped to a single dose: the offending dose is
/// excluded from the timeline and its error is collected into
/// [`SimulationOutput::rejected`](crate::simulator::SimulationOutput), the
/// rest of the computation proceeds.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationError {
    /// Profile parameters (possibly after scaling and overrides) violate the
    /// profile invariant
    #[error("invalid profile for '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    /// Dose-level validation failed (quantity, administration time)
    #[error("invalid dose: {reason}")]
    InvalidDose { reason: String },

    /// No profile found for a dose's substance reference
    #[error("unknown substance '{0}'")]
    UnknownSubstance(String),

    /// Time grid configuration is unusable
    #[error("invalid time grid: {reason}")]
    InvalidGrid { reason: String },
}
