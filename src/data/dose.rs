//! Dose records: a single administration of a substance
//!
//! Doses are owned by the caller and consumed read-only by each pipeline
//! invocation. The engine holds no dose state between calls; editing a dose
//! means replacing it and re-running the simulation.

use crate::data::grid::HORIZON_MINUTES;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};

/// Optional per-dose parameter overrides
///
/// Any subset of the effective curve parameters can be overridden. Overrides
/// are applied after quantity scaling, so an explicit value always wins over
/// the scaled default. The resulting parameter set is re-validated against
/// the profile invariant before curve generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterOverrides {
    pub onset_time: Option<f64>,
    pub time_to_peak: Option<f64>,
    pub plateau_duration: Option<f64>,
    pub total_duration: Option<f64>,
    pub peak_effect: Option<f64>,
}

impl ParameterOverrides {
    pub fn is_empty(&self) -> bool {
        self.onset_time.is_none()
            && self.time_to_peak.is_none()
            && self.plateau_duration.is_none()
            && self.total_duration.is_none()
            && self.peak_effect.is_none()
    }
}

/// One administered dose of a substance within the 24 h horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    /// Minutes after 0:00, in `[0, 1440)`
    pub administration_time: f64,
    /// Key into the substance profile map
    pub substance: String,
    /// Unit count (pills, cups, cans); must be at least 1
    pub quantity: u32,
    /// Optional overrides of the scaled curve parameters
    #[serde(default)]
    pub overrides: ParameterOverrides,
}

impl Dose {
    /// A single-unit dose of `substance` at `administration_time` minutes
    pub fn new(administration_time: f64, substance: impl Into<String>) -> Self {
        Dose {
            administration_time,
            substance: substance.into(),
            quantity: 1,
            overrides: ParameterOverrides::default(),
        }
    }

    /// Set the unit count
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Override onset time (minutes)
    pub fn with_onset_time(mut self, minutes: f64) -> Self {
        self.overrides.onset_time = Some(minutes);
        self
    }

    /// Override time to peak (minutes)
    pub fn with_time_to_peak(mut self, minutes: f64) -> Self {
        self.overrides.time_to_peak = Some(minutes);
        self
    }

    /// Override plateau duration (minutes)
    pub fn with_plateau_duration(mut self, minutes: f64) -> Self {
        self.overrides.plateau_duration = Some(minutes);
        self
    }

    /// Override total duration (minutes)
    pub fn with_total_duration(mut self, minutes: f64) -> Self {
        self.overrides.total_duration = Some(minutes);
        self
    }

    /// Override peak effect (on the substance's category scale)
    pub fn with_peak_effect(mut self, value: f64) -> Self {
        self.overrides.peak_effect = Some(value);
        self
    }

    /// Check dose-level validity (time in range, quantity positive)
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.administration_time.is_finite()
            || self.administration_time < 0.0
            || self.administration_time >= HORIZON_MINUTES
        {
            return Err(SimulationError::InvalidDose {
                reason: format!(
                    "administration_time must be in [0, {}), got {}",
                    HORIZON_MINUTES, self.administration_time
                ),
            });
        }
        if self.quantity == 0 {
            return Err(SimulationError::InvalidDose {
                reason: "quantity must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}
