//! Simulation pipeline: doses in, analyzed timeline out
//!
//! The pipeline is synchronous and runs to completion per invocation:
//! validate → scale → generate per-dose curves → combine with saturation →
//! analyze windows → report coverage. Each call receives an immutable
//! snapshot of doses and profiles and returns an independently owned result;
//! re-invocation on every input change is the expected usage pattern.

pub mod cache;
pub mod combine;
pub mod curve;
pub mod scaling;

pub use combine::{combine, CombinedTimeline, HillParams, HillSettings};
pub use curve::{effect_at, generate_curve, EffectCurve};
pub use scaling::{EffectiveParams, ScalingPolicy, ScalingRule};

use crate::analysis::{
    self, CoverageSummary, DoseSpan, SleepSensitivity, Window,
};
use crate::data::{Category, Dose, ProfileMap, TimeGrid};
use crate::error::SimulationError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Complete pipeline configuration
///
/// Thresholds default to the values used by the original clinical model:
/// sleep threshold 0.3 (moderately sensitive), 6 h minimum sleep window,
/// peak windows at 80 % of the daily maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Sampling grid (default: 1-minute steps over 24 h)
    pub grid: TimeGrid,
    /// Per-formulation multi-unit scaling rules
    pub scaling: ScalingPolicy,
    /// Per-category Hill saturation parameters
    pub hill: HillSettings,
    /// Combined effect at or below which sleep is eligible
    pub sleep_threshold: f64,
    /// Minimum qualifying sleep window length, minutes
    pub sleep_min_length: f64,
    /// Peak windows require combined effect ≥ this fraction of the maximum
    pub peak_fraction: f64,
    /// Minimum qualifying peak window length, minutes
    pub peak_min_length: f64,
    /// Coverage target; falls back to `sleep_threshold` when unset
    pub target_threshold: Option<f64>,
    /// Individual curve value above which a dose counts as contributing
    pub contribution_epsilon: f64,
    /// Memoize generated curves across invocations (pure optimization)
    pub cache: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            grid: TimeGrid::default(),
            scaling: ScalingPolicy::default(),
            hill: HillSettings::default(),
            sleep_threshold: 0.3,
            sleep_min_length: 360.0,
            peak_fraction: 0.8,
            peak_min_length: 0.0,
            target_threshold: None,
            contribution_epsilon: 1e-3,
            cache: true,
        }
    }
}

impl SimulationOptions {
    /// Set the sampling grid
    pub fn with_grid(mut self, grid: TimeGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Set the multi-unit scaling policy
    pub fn with_scaling(mut self, scaling: ScalingPolicy) -> Self {
        self.scaling = scaling;
        self
    }

    /// Override Hill parameters for one category
    pub fn with_hill_params(mut self, category: Category, params: HillParams) -> Self {
        self.hill = self.hill.with_params(category, params);
        self
    }

    /// Set the sleep threshold directly
    pub fn with_sleep_threshold(mut self, threshold: f64) -> Self {
        self.sleep_threshold = threshold;
        self
    }

    /// Set the sleep threshold from a sensitivity tier
    pub fn with_sleep_sensitivity(mut self, tier: SleepSensitivity) -> Self {
        self.sleep_threshold = tier.threshold();
        self
    }

    /// Set the minimum sleep window length, minutes
    pub fn with_sleep_min_length(mut self, minutes: f64) -> Self {
        self.sleep_min_length = minutes;
        self
    }

    /// Set the peak window threshold fraction
    pub fn with_peak_fraction(mut self, fraction: f64) -> Self {
        self.peak_fraction = fraction;
        self
    }

    /// Set the minimum peak window length, minutes
    pub fn with_peak_min_length(mut self, minutes: f64) -> Self {
        self.peak_min_length = minutes;
        self
    }

    /// Set the coverage target threshold
    pub fn with_target_threshold(mut self, threshold: f64) -> Self {
        self.target_threshold = Some(threshold);
        self
    }

    /// Enable or disable curve memoization
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

/// A dose excluded from the timeline, with the validation error that
/// excluded it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedDose {
    /// Index of the dose in the input dose list
    pub dose_id: usize,
    /// Why it was excluded
    pub error: SimulationError,
}

/// Everything one pipeline invocation produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Saturated combined timeline with per-sample contributors
    pub timeline: CombinedTimeline,
    /// Individual per-dose curves, for plotting
    pub curves: Vec<EffectCurve>,
    /// Qualifying sleep-eligible windows
    pub sleep_windows: Vec<Window>,
    /// Qualifying peak-effect windows
    pub peak_windows: Vec<Window>,
    /// Coverage summary against the target threshold
    pub coverage: CoverageSummary,
    /// Doses excluded by validation, with their errors
    pub rejected: Vec<RejectedDose>,
}

/// A dose that passed validation, ready for curve generation
struct PreparedDose {
    dose_id: usize,
    label: String,
    administration_time: f64,
    category: Category,
    params: EffectiveParams,
}

/// Validate one dose against the profile map and resolve its parameters
fn prepare_dose(
    dose_id: usize,
    dose: &Dose,
    profiles: &ProfileMap,
    scaling: &ScalingPolicy,
) -> Result<PreparedDose, SimulationError> {
    dose.validate()?;
    let profile = profiles
        .get(&dose.substance)
        .ok_or_else(|| SimulationError::UnknownSubstance(dose.substance.clone()))?;
    let params = scaling.effective_params(profile, dose)?;

    let label = if dose.quantity > 1 {
        format!("{}x {}", dose.quantity, profile.name)
    } else {
        profile.name.clone()
    };

    Ok(PreparedDose {
        dose_id,
        label,
        administration_time: dose.administration_time,
        category: profile.category,
        params,
    })
}

/// Run the full pipeline on a snapshot of doses and profiles
///
/// Validation errors are scoped to the offending dose: it lands in
/// [`SimulationOutput::rejected`] and the rest of the timeline is computed
/// normally. The Hill parameters are looked up for the category of the first
/// valid dose; doses in one invocation are expected to share an effect scale.
pub fn simulate(
    doses: &[Dose],
    profiles: &ProfileMap,
    options: &SimulationOptions,
) -> SimulationOutput {
    let mut prepared = Vec::with_capacity(doses.len());
    let mut rejected = Vec::new();

    for (dose_id, dose) in doses.iter().enumerate() {
        match prepare_dose(dose_id, dose, profiles, &options.scaling) {
            Ok(p) => prepared.push(p),
            Err(error) => rejected.push(RejectedDose { dose_id, error }),
        }
    }

    let curves: Vec<EffectCurve> = prepared
        .par_iter()
        .map(|p| {
            generate_curve(
                p.dose_id,
                p.label.clone(),
                &p.params,
                p.administration_time,
                &options.grid,
                options.cache,
            )
        })
        .collect();

    let hill_category = prepared
        .first()
        .map(|p| p.category)
        .unwrap_or(Category::Medication);
    let hill = options.hill.params(hill_category);

    let timeline = combine(&curves, &options.grid, &hill, options.contribution_epsilon);

    let sleep_windows = analysis::find_sleep_windows(
        &timeline,
        options.sleep_threshold,
        options.sleep_min_length,
    );
    let peak_windows =
        analysis::find_peak_windows(&timeline, options.peak_fraction, options.peak_min_length);

    let spans: Vec<DoseSpan> = prepared
        .iter()
        .map(|p| DoseSpan {
            dose_id: p.dose_id,
            start: p.administration_time,
            end: p.administration_time + p.params.total_duration,
        })
        .collect();
    let target = options.target_threshold.unwrap_or(options.sleep_threshold);
    let coverage = analysis::report(&timeline, &spans, target);

    SimulationOutput {
        timeline,
        curves,
        sleep_windows,
        peak_windows,
        coverage,
        rejected,
    }
}
