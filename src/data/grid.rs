//! Sampling grid over the 24-hour horizon

use crate::error::SimulationError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Length of the simulated horizon in minutes
pub const HORIZON_MINUTES: f64 = 1440.0;

/// Uniform sampling grid over `[0, 1440)` minutes
///
/// The default resolution is one sample per minute (1440 samples). Coarser
/// grids trade fidelity for speed; window and gap detection are exact on the
/// sampled grid, so sub-step features are invisible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    step: f64,
    len: usize,
}

impl TimeGrid {
    /// Build a grid with the given step in minutes
    pub fn new(step: f64) -> Result<Self, SimulationError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SimulationError::InvalidGrid {
                reason: format!("step must be > 0 minutes, got {}", step),
            });
        }
        if step > HORIZON_MINUTES {
            return Err(SimulationError::InvalidGrid {
                reason: format!("step ({} min) exceeds the 24 h horizon", step),
            });
        }
        let len = (HORIZON_MINUTES / step).ceil() as usize;
        Ok(TimeGrid { step, len })
    }

    /// Step between samples, in minutes
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of samples on the grid
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time in minutes at sample `i`
    pub fn time_at(&self, i: usize) -> f64 {
        i as f64 * self.step
    }

    /// All sample times as an array
    pub fn times(&self) -> Array1<f64> {
        Array1::from_iter((0..self.len).map(|i| self.time_at(i)))
    }

    /// A zeroed value array matching this grid
    pub fn zeros(&self) -> Array1<f64> {
        Array1::zeros(self.len)
    }
}

impl Default for TimeGrid {
    /// One-minute resolution, 1440 samples
    fn default() -> Self {
        TimeGrid {
            step: 1.0,
            len: 1440,
        }
    }
}
