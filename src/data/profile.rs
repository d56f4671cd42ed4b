//! Static per-substance pharmacokinetic parameters
//!
//! A [`SubstanceProfile`] describes the population-average trapezoid shape of
//! a single unit of a substance: how long it takes to come on, how long it
//! holds its peak, and when it has fully worn off. Profiles are immutable
//! once constructed; quantity scaling and per-dose overrides happen later in
//! the pipeline and never write back into the profile.

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Substance category, which fixes the effect scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Everyday stimulants (coffee, energy drinks)
    Stimulant,
    /// Prescription ADHD medication
    Medication,
    /// Over-the-counter or prescription analgesics
    Painkiller,
}

impl Category {
    /// The effect scale this category is measured on
    pub fn scale(&self) -> EffectScale {
        match self {
            Category::Stimulant | Category::Medication => EffectScale::Energy,
            Category::Painkiller => EffectScale::Relief,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Stimulant => write!(f, "stimulant"),
            Category::Medication => write!(f, "medication"),
            Category::Painkiller => write!(f, "painkiller"),
        }
    }
}

/// Effect magnitude scale, tagged by category
///
/// Stimulants and medications are measured on a normalized 0–1 energy scale,
/// painkillers on a 1–10 relief scale. Keeping the scale explicit lets the
/// Hill ceiling/K defaults be a table lookup instead of ad hoc branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectScale {
    /// Normalized energy/alertness, 0–1
    Energy,
    /// Pain relief, 1–10
    Relief,
}

impl EffectScale {
    /// Maximum meaningful value on this scale
    pub fn max_value(&self) -> f64 {
        match self {
            EffectScale::Energy => 1.0,
            EffectScale::Relief => 10.0,
        }
    }

    /// Typical peak effect of a single standard dose on this scale
    ///
    /// Used to derive the default Hill half-saturation constant so that one
    /// dose at its own peak passes through the saturating transform roughly
    /// unchanged.
    pub fn typical_peak(&self) -> f64 {
        match self {
            EffectScale::Energy => 0.8,
            EffectScale::Relief => 6.0,
        }
    }
}

/// Release formulation, which selects the multi-unit scaling rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formulation {
    ImmediateRelease,
    ExtendedRelease,
    ModifiedRelease,
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formulation::ImmediateRelease => write!(f, "immediate-release"),
            Formulation::ExtendedRelease => write!(f, "extended-release"),
            Formulation::ModifiedRelease => write!(f, "modified-release"),
        }
    }
}

/// Static pharmacokinetic parameters for one unit of a substance
///
/// All times are minutes relative to administration. The effect curve built
/// from a profile is a trapezoid: linear rise over `onset_time`, constant at
/// `peak_effect` for `plateau_duration`, then linear decay reaching zero at
/// `total_duration`.
///
/// Invariant: `onset_time > 0`, `time_to_peak >= onset_time`,
/// `plateau_duration >= 0`, `peak_effect > 0`, and
/// `onset_time + plateau_duration <= total_duration`. Equality means the
/// profile has no decay phase and drops to zero at `total_duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceProfile {
    /// Substance name, also the lookup key used by doses
    pub name: String,
    /// Substance category (fixes the effect scale)
    pub category: Category,
    /// Release formulation (fixes the multi-unit scaling rule)
    pub formulation: Formulation,
    /// Minutes from administration to full onset
    pub onset_time: f64,
    /// Minutes from administration to maximum effect (Tmax)
    pub time_to_peak: f64,
    /// Minutes the effect holds at peak before decaying
    pub plateau_duration: f64,
    /// Minutes from administration to complete wear-off
    pub total_duration: f64,
    /// Peak effect of a single unit, on the category's scale
    pub peak_effect: f64,
}

impl SubstanceProfile {
    /// Construct a validated profile
    pub fn new(
        name: impl Into<String>,
        category: Category,
        formulation: Formulation,
        onset_time: f64,
        time_to_peak: f64,
        plateau_duration: f64,
        total_duration: f64,
        peak_effect: f64,
    ) -> Result<Self, SimulationError> {
        let profile = SubstanceProfile {
            name: name.into(),
            category,
            formulation,
            onset_time,
            time_to_peak,
            plateau_duration,
            total_duration,
            peak_effect,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the profile invariant
    pub fn validate(&self) -> Result<(), SimulationError> {
        validate_curve_params(
            &self.name,
            self.onset_time,
            self.time_to_peak,
            self.plateau_duration,
            self.total_duration,
            self.peak_effect,
        )
    }

    /// The effect scale this profile's `peak_effect` is measured on
    pub fn scale(&self) -> EffectScale {
        self.category.scale()
    }
}

/// Shared invariant check for profile parameters
///
/// Also applied to effective parameters after scaling and overrides, so a
/// dose can never reach the curve generator with an inconsistent shape.
pub(crate) fn validate_curve_params(
    name: &str,
    onset_time: f64,
    time_to_peak: f64,
    plateau_duration: f64,
    total_duration: f64,
    peak_effect: f64,
) -> Result<(), SimulationError> {
    let fail = |reason: String| {
        Err(SimulationError::InvalidProfile {
            name: name.to_string(),
            reason,
        })
    };

    if !onset_time.is_finite() || onset_time <= 0.0 {
        return fail(format!("onset_time must be > 0, got {}", onset_time));
    }
    if !time_to_peak.is_finite() || time_to_peak < onset_time {
        return fail(format!(
            "time_to_peak ({}) must be >= onset_time ({})",
            time_to_peak, onset_time
        ));
    }
    if !plateau_duration.is_finite() || plateau_duration < 0.0 {
        return fail(format!(
            "plateau_duration must be >= 0, got {}",
            plateau_duration
        ));
    }
    if !total_duration.is_finite() || onset_time + plateau_duration > total_duration {
        return fail(format!(
            "onset_time + plateau_duration ({}) exceeds total_duration ({})",
            onset_time + plateau_duration,
            total_duration
        ));
    }
    if !peak_effect.is_finite() || peak_effect <= 0.0 {
        return fail(format!("peak_effect must be > 0, got {}", peak_effect));
    }
    Ok(())
}
