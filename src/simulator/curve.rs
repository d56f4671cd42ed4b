//! Per-dose effect curve generation
//!
//! A dose produces a trapezoid in elapsed time: linear rise to the peak over
//! the onset, a constant plateau, then a linear decay to zero. The curve is
//! sampled on the shared grid; doses administered late in the day truncate at
//! midnight rather than wrapping, since the engine knows nothing about the
//! next day.

use crate::data::TimeGrid;
use crate::simulator::cache;
use crate::simulator::scaling::EffectiveParams;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Sampled effect-over-time curve for a single dose
///
/// Owned by the pipeline invocation that produced it; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectCurve {
    /// Index of the originating dose in the input dose list
    pub dose_id: usize,
    /// Human-readable label for plotting ("2x ibuprofen_400mg")
    pub label: String,
    /// One effect value per grid sample
    pub values: Array1<f64>,
}

impl EffectCurve {
    /// Maximum value over the horizon
    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }
}

/// Evaluate the trapezoid at one elapsed time `e` (minutes since the dose)
///
/// Zero outside `[0, total_duration)`.
#[inline]
pub fn effect_at(params: &EffectiveParams, e: f64) -> f64 {
    if e < 0.0 || e >= params.total_duration {
        return 0.0;
    }
    let plateau_end = params.onset_time + params.plateau_duration;
    if e < params.onset_time {
        // Rise phase: linear ramp from 0 to peak
        params.peak_effect * (e / params.onset_time)
    } else if e < plateau_end {
        params.peak_effect
    } else {
        // Decay phase: linear decline to 0 at total_duration
        let decay_span = params.total_duration - plateau_end;
        if decay_span <= 0.0 {
            // No decay phase: the plateau runs to total_duration
            params.peak_effect
        } else {
            params.peak_effect * (1.0 - (e - plateau_end) / decay_span)
        }
    }
}

/// Sample the trapezoid for one dose on the grid
///
/// `params` must already be scaled and override-resolved (and therefore
/// valid). When `use_cache` is set, a previously generated curve for the same
/// (params, time, grid) key is reused; generation is a pure function of its
/// inputs, so the result is identical either way.
pub fn generate_curve(
    dose_id: usize,
    label: String,
    params: &EffectiveParams,
    administration_time: f64,
    grid: &TimeGrid,
    use_cache: bool,
) -> EffectCurve {
    if use_cache {
        if let Some(values) = cache::get_entry(params, administration_time, grid) {
            return EffectCurve {
                dose_id,
                label,
                values,
            };
        }
    }

    let values = Array1::from_iter(
        (0..grid.len()).map(|i| effect_at(params, grid.time_at(i) - administration_time)),
    );

    if use_cache {
        cache::insert_entry(params, administration_time, grid, &values);
    }

    EffectCurve {
        dose_id,
        label,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> EffectiveParams {
        EffectiveParams {
            onset_time: 20.0,
            time_to_peak: 60.0,
            plateau_duration: 0.0,
            total_duration: 240.0,
            peak_effect: 0.8,
        }
    }

    #[test]
    fn trapezoid_endpoints() {
        let p = params();
        assert_eq!(effect_at(&p, -1.0), 0.0);
        assert_eq!(effect_at(&p, 0.0), 0.0);
        assert_relative_eq!(effect_at(&p, 20.0), 0.8);
        assert_relative_eq!(effect_at(&p, 240.0), 0.0);
        assert_eq!(effect_at(&p, 500.0), 0.0);
    }

    #[test]
    fn rise_is_monotone_nondecreasing() {
        let p = params();
        let mut last = 0.0;
        for e in 0..=20 {
            let v = effect_at(&p, e as f64);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn decay_is_monotone_nonincreasing() {
        let p = params();
        let mut last = f64::INFINITY;
        for e in 20..=240 {
            let v = effect_at(&p, e as f64);
            assert!(v <= last);
            last = v;
        }
    }

    #[test]
    fn plateau_holds_peak() {
        let p = EffectiveParams {
            plateau_duration: 100.0,
            ..params()
        };
        for e in [20.0, 50.0, 119.9] {
            assert_relative_eq!(effect_at(&p, e), 0.8);
        }
        assert!(effect_at(&p, 120.1) < 0.8);
    }

    #[test]
    fn no_decay_profile_drops_at_total_duration() {
        // plateau extends exactly to total_duration
        let p = EffectiveParams {
            onset_time: 40.0,
            time_to_peak: 40.0,
            plateau_duration: 200.0,
            total_duration: 240.0,
            peak_effect: 0.5,
        };
        assert_relative_eq!(effect_at(&p, 239.9), 0.5);
        assert_eq!(effect_at(&p, 240.0), 0.0);
    }

    #[test]
    fn late_dose_truncates_at_midnight() {
        let grid = TimeGrid::default();
        let curve = generate_curve(0, "late".to_string(), &params(), 1380.0, &grid, false);
        // Active from 1380 to end of horizon, no wrap to the morning
        assert_eq!(curve.values[0], 0.0);
        assert_eq!(curve.values[1379], 0.0);
        assert!(curve.values[1400] > 0.0);
        assert!(curve.values[1439] > 0.0);
    }

    #[test]
    fn cached_and_uncached_curves_agree() {
        let grid = TimeGrid::default();
        let p = params();
        let fresh = generate_curve(0, "a".to_string(), &p, 480.0, &grid, false);
        let warm = generate_curve(0, "a".to_string(), &p, 480.0, &grid, true);
        let hit = generate_curve(1, "b".to_string(), &p, 480.0, &grid, true);
        assert_eq!(fresh.values, warm.values);
        assert_eq!(fresh.values, hit.values);
    }
}
