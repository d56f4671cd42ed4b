//! Saturating combination of concurrent effect curves
//!
//! Raw per-dose effects are summed and pushed through a Hill transform
//! `ceiling · Sⁿ / (Sⁿ + Kⁿ)`. Near-linear for small sums, the transform
//! flattens toward the ceiling as doses stack, so the combined level stays
//! clinically plausible no matter how many curves overlap.

use crate::data::{Category, TimeGrid};
use crate::simulator::curve::EffectCurve;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hill transform parameters for one category scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillParams {
    /// Half-saturation constant K
    pub k: f64,
    /// Hill coefficient n
    pub n: f64,
    /// Asymptotic ceiling; the combined value approaches but never reaches it
    pub ceiling: f64,
}

impl HillParams {
    /// Defaults for a category scale
    ///
    /// The ceiling is the scale maximum. K is chosen so the transform has a
    /// fixed point at the scale's typical single-dose peak `p`:
    /// `ceiling · pⁿ / (pⁿ + Kⁿ) = p` gives `K = (pⁿ⁻¹·(ceiling − p))^(1/n)`,
    /// i.e. `K = sqrt(p·(ceiling − p))` for n = 2. One dose at its own peak
    /// therefore passes through with its own value; only stacked doses are
    /// compressed.
    pub fn for_category(category: Category) -> Self {
        let scale = category.scale();
        let ceiling = scale.max_value();
        let p = scale.typical_peak();
        HillParams {
            k: (p * (ceiling - p)).sqrt(),
            n: 2.0,
            ceiling,
        }
    }

    /// Apply the transform to a raw effect sum
    #[inline]
    pub fn apply(&self, raw_sum: f64) -> f64 {
        if raw_sum <= 0.0 {
            return 0.0;
        }
        let s_n = raw_sum.powf(self.n);
        self.ceiling * s_n / (s_n + self.k.powf(self.n))
    }
}

/// Per-category Hill parameter table with override support
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HillSettings {
    overrides: HashMap<Category, HillParams>,
}

impl HillSettings {
    /// Override the parameters for one category
    pub fn with_params(mut self, category: Category, params: HillParams) -> Self {
        self.overrides.insert(category, params);
        self
    }

    /// Parameters for a category (configured override or scale defaults)
    pub fn params(&self, category: Category) -> HillParams {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| HillParams::for_category(category))
    }
}

/// Combined-effect timeline over the 24 h grid
///
/// One saturated aggregate value per sample, plus the ids of doses whose
/// individual curve contributed more than a negligible amount at that sample
/// (used downstream to explain windows and attribute gaps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTimeline {
    /// Sample times in minutes
    pub times: Array1<f64>,
    /// Saturated combined effect per sample
    pub values: Array1<f64>,
    /// Dose ids contributing above epsilon, per sample
    pub contributors: Vec<Vec<usize>>,
    /// Grid step in minutes (needed to convert sample runs into durations)
    pub step: f64,
}

impl CombinedTimeline {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum combined effect over the horizon
    pub fn max(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }
}

/// Sum concurrent curves and apply the Hill transform
///
/// Curves must all be sampled on `grid`. Per-sample dose ids with an
/// individual value above `epsilon` are recorded as contributors.
pub fn combine(
    curves: &[EffectCurve],
    grid: &TimeGrid,
    hill: &HillParams,
    epsilon: f64,
) -> CombinedTimeline {
    let mut values = grid.zeros();
    let mut contributors = vec![Vec::new(); grid.len()];

    for i in 0..grid.len() {
        let mut raw_sum = 0.0;
        for curve in curves {
            let v = curve.values[i];
            raw_sum += v;
            if v > epsilon {
                contributors[i].push(curve.dose_id);
            }
        }
        values[i] = hill.apply(raw_sum);
    }

    CombinedTimeline {
        times: grid.times(),
        values,
        contributors,
        step: grid.step(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn energy_defaults_fix_point_at_typical_peak() {
        let hill = HillParams::for_category(Category::Medication);
        assert_relative_eq!(hill.ceiling, 1.0);
        assert_relative_eq!(hill.k, 0.4);
        // Fixed point: a single dose at the typical peak keeps its value
        assert_relative_eq!(hill.apply(0.8), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn relief_defaults_fix_point_at_typical_peak() {
        let hill = HillParams::for_category(Category::Painkiller);
        assert_relative_eq!(hill.ceiling, 10.0);
        assert_relative_eq!(hill.apply(6.0), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn transform_stays_strictly_below_ceiling() {
        let hill = HillParams::for_category(Category::Stimulant);
        for s in [0.5, 1.0, 3.0, 10.0, 1000.0] {
            assert!(hill.apply(s) < hill.ceiling);
        }
    }

    #[test]
    fn transform_is_monotone() {
        let hill = HillParams::for_category(Category::Painkiller);
        let mut last = -1.0;
        for i in 0..200 {
            let v = hill.apply(i as f64 * 0.2);
            assert!(v > last);
            last = v;
        }
    }

    #[test]
    fn zero_sum_maps_to_zero() {
        let hill = HillParams::for_category(Category::Medication);
        assert_eq!(hill.apply(0.0), 0.0);
    }

    #[test]
    fn settings_fall_back_to_scale_defaults() {
        let settings = HillSettings::default().with_params(
            Category::Stimulant,
            HillParams {
                k: 0.5,
                n: 1.5,
                ceiling: 1.2,
            },
        );
        assert_eq!(settings.params(Category::Stimulant).n, 1.5);
        assert_eq!(
            settings.params(Category::Painkiller),
            HillParams::for_category(Category::Painkiller)
        );
    }
}
