//! Multi-unit dose scaling
//!
//! Taking several units of the same formulation does not simply multiply the
//! curve. Extended/modified-release formulations stagger their release, so
//! extra units mostly prolong the effect; immediate-release units stack, so
//! extra units mostly raise the peak. The rule is a per-formulation strategy
//! table so callers can reconfigure it; the extended-release rule in
//! particular has no firm clinical documentation and defaults to the
//! modified-release behaviour.

use crate::data::{Dose, Formulation, SubstanceProfile};
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Curve parameters after quantity scaling and overrides
///
/// This is the parameter set the curve generator actually consumes. It
/// satisfies the same invariant as [`SubstanceProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParams {
    pub onset_time: f64,
    pub time_to_peak: f64,
    pub plateau_duration: f64,
    pub total_duration: f64,
    pub peak_effect: f64,
}

impl EffectiveParams {
    fn from_profile(profile: &SubstanceProfile) -> Self {
        EffectiveParams {
            onset_time: profile.onset_time,
            time_to_peak: profile.time_to_peak,
            plateau_duration: profile.plateau_duration,
            total_duration: profile.total_duration,
            peak_effect: profile.peak_effect,
        }
    }

    /// Apply explicit per-dose overrides; overrides win over scaled defaults
    fn apply_overrides(&mut self, dose: &Dose) {
        let ov = &dose.overrides;
        if let Some(v) = ov.onset_time {
            self.onset_time = v;
        }
        if let Some(v) = ov.time_to_peak {
            self.time_to_peak = v;
        }
        if let Some(v) = ov.plateau_duration {
            self.plateau_duration = v;
        }
        if let Some(v) = ov.total_duration {
            self.total_duration = v;
        }
        if let Some(v) = ov.peak_effect {
            self.peak_effect = v;
        }
    }

    /// Re-check the profile invariant on the final parameter set
    fn validate(&self, name: &str) -> Result<(), SimulationError> {
        crate::data::profile::validate_curve_params(
            name,
            self.onset_time,
            self.time_to_peak,
            self.plateau_duration,
            self.total_duration,
            self.peak_effect,
        )
    }
}

/// How extra units of a formulation reshape the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingRule {
    /// Each extra unit extends `total_duration` (and the plateau with it) by
    /// this fraction of the base duration; peak unchanged
    ExtendDuration { per_unit: f64 },
    /// Each extra unit raises `peak_effect` by this fraction of the base
    /// peak; durations unchanged
    BoostPeak { per_unit: f64 },
}

impl ScalingRule {
    fn apply(&self, params: &mut EffectiveParams, quantity: u32) {
        let extra = (quantity - 1) as f64;
        match self {
            ScalingRule::ExtendDuration { per_unit } => {
                let factor = 1.0 + per_unit * extra;
                params.total_duration *= factor;
                // The plateau stretches with the release profile
                params.plateau_duration *= factor;
            }
            ScalingRule::BoostPeak { per_unit } => {
                params.peak_effect *= 1.0 + per_unit * extra;
            }
        }
    }
}

/// Per-formulation scaling strategy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    rules: HashMap<Formulation, ScalingRule>,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            Formulation::ImmediateRelease,
            ScalingRule::BoostPeak { per_unit: 0.40 },
        );
        rules.insert(
            Formulation::ModifiedRelease,
            ScalingRule::ExtendDuration { per_unit: 0.30 },
        );
        // No firm clinical documentation for extended-release stacking;
        // treated like modified-release until confirmed otherwise.
        rules.insert(
            Formulation::ExtendedRelease,
            ScalingRule::ExtendDuration { per_unit: 0.30 },
        );
        ScalingPolicy { rules }
    }
}

impl ScalingPolicy {
    /// Replace the rule for one formulation
    pub fn with_rule(mut self, formulation: Formulation, rule: ScalingRule) -> Self {
        self.rules.insert(formulation, rule);
        self
    }

    /// The rule used for a formulation (identity if none is configured)
    pub fn rule(&self, formulation: Formulation) -> Option<ScalingRule> {
        self.rules.get(&formulation).copied()
    }

    /// Scale a profile for a unit count
    ///
    /// `quantity == 1` returns the profile parameters unchanged. The unit
    /// count itself is validated at the dose level; this only applies the
    /// formulation rule.
    pub fn scale(&self, profile: &SubstanceProfile, quantity: u32) -> EffectiveParams {
        let mut params = EffectiveParams::from_profile(profile);
        if quantity > 1 {
            if let Some(rule) = self.rules.get(&profile.formulation) {
                rule.apply(&mut params, quantity);
            }
        }
        params
    }

    /// Full parameter resolution for a dose: scale, apply overrides, validate
    pub fn effective_params(
        &self,
        profile: &SubstanceProfile,
        dose: &Dose,
    ) -> Result<EffectiveParams, SimulationError> {
        let mut params = self.scale(profile, dose.quantity);
        params.apply_overrides(dose);
        params.validate(&profile.name)?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;
    use approx::assert_relative_eq;

    fn ir_profile() -> SubstanceProfile {
        SubstanceProfile::new(
            "paracetamol_500mg",
            Category::Painkiller,
            Formulation::ImmediateRelease,
            30.0,
            60.0,
            90.0,
            300.0,
            5.0,
        )
        .unwrap()
    }

    fn mr_profile() -> SubstanceProfile {
        SubstanceProfile::new(
            "tramadol_mr",
            Category::Painkiller,
            Formulation::ModifiedRelease,
            60.0,
            240.0,
            240.0,
            720.0,
            7.0,
        )
        .unwrap()
    }

    #[test]
    fn single_unit_unchanged() {
        let policy = ScalingPolicy::default();
        let params = policy.scale(&ir_profile(), 1);
        assert_eq!(params.peak_effect, 5.0);
        assert_eq!(params.total_duration, 300.0);
    }

    #[test]
    fn immediate_release_boosts_peak() {
        let policy = ScalingPolicy::default();
        let params = policy.scale(&ir_profile(), 3);
        // 1 + 0.4 * 2 = 1.8
        assert_relative_eq!(params.peak_effect, 5.0 * 1.8);
        assert_eq!(params.total_duration, 300.0);
        assert_eq!(params.onset_time, 30.0);
    }

    #[test]
    fn modified_release_extends_duration() {
        let policy = ScalingPolicy::default();
        let params = policy.scale(&mr_profile(), 3);
        // 1 + 0.3 * 2 = 1.6
        assert_relative_eq!(params.total_duration, 720.0 * 1.6);
        assert_relative_eq!(params.plateau_duration, 240.0 * 1.6);
        assert_eq!(params.peak_effect, 7.0);
    }

    #[test]
    fn extended_release_follows_modified_release_by_default() {
        let policy = ScalingPolicy::default();
        assert_eq!(
            policy.rule(Formulation::ExtendedRelease),
            Some(ScalingRule::ExtendDuration { per_unit: 0.30 })
        );
    }

    #[test]
    fn rule_is_reconfigurable() {
        let policy = ScalingPolicy::default().with_rule(
            Formulation::ExtendedRelease,
            ScalingRule::BoostPeak { per_unit: 0.25 },
        );
        let mut profile = mr_profile();
        profile.formulation = Formulation::ExtendedRelease;
        let params = policy.scale(&profile, 2);
        assert_relative_eq!(params.peak_effect, 7.0 * 1.25);
        assert_eq!(params.total_duration, 720.0);
    }

    #[test]
    fn overrides_win_over_scaling() {
        let policy = ScalingPolicy::default();
        let dose = Dose::new(480.0, "paracetamol_500mg")
            .with_quantity(3)
            .with_peak_effect(4.0);
        let params = policy.effective_params(&ir_profile(), &dose).unwrap();
        // Scaling would give 9.0; explicit override wins
        assert_eq!(params.peak_effect, 4.0);
    }

    #[test]
    fn invalid_override_combination_is_rejected() {
        let policy = ScalingPolicy::default();
        let dose = Dose::new(480.0, "paracetamol_500mg").with_total_duration(60.0);
        // onset 30 + plateau 90 > total 60
        let result = policy.effective_params(&ir_profile(), &dose);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidProfile { .. })
        ));
    }
}
