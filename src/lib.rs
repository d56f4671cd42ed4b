//! Simulation of daily medication and stimulant effect timelines
//!
//! `pharmtime` turns a list of administered doses into a combined
//! effect-over-time curve across a fixed 24-hour horizon and derives the
//! summaries a scheduling UI needs: sleep-eligible windows, peak-effect
//! windows, and coverage gaps between doses.
//!
//! The model is a population-average trapezoid per dose (linear rise over the
//! onset, plateau at peak, linear decay), scaled for multi-unit doses by
//! formulation-specific rules, and combined across concurrent doses with a
//! saturating Hill transform so stacked doses flatten toward a ceiling
//! instead of adding without bound.
//!
//! # Example
//!
//! ```
//! use pharmtime::prelude::*;
//!
//! let profiles = profile_map([SubstanceProfile::new(
//!     "methylphenidate_20mg_ir",
//!     Category::Medication,
//!     Formulation::ImmediateRelease,
//!     20.0,  // onset, minutes
//!     60.0,  // Tmax
//!     0.0,   // plateau
//!     240.0, // total duration
//!     0.8,   // peak effect (energy scale)
//! )
//! .unwrap()]);
//!
//! let doses = vec![Dose::new(480.0, "methylphenidate_20mg_ir")];
//! let output = simulate(&doses, &profiles, &SimulationOptions::default());
//!
//! assert!(output.rejected.is_empty());
//! assert!(!output.sleep_windows.is_empty());
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod simulator;

pub use crate::analysis::{
    find_peak_windows, find_sleep_windows, report, CoverageClass, CoverageSummary, DoseSpan,
    GapInterval, SleepSensitivity, Window, WindowKind,
};
pub use crate::data::{
    profile_map, Category, Dose, EffectScale, Formulation, ParameterOverrides, ProfileMap,
    SubstanceProfile, TimeGrid, HORIZON_MINUTES,
};
pub use crate::error::SimulationError;
pub use crate::simulator::{
    combine, effect_at, generate_curve, simulate, CombinedTimeline, EffectCurve, EffectiveParams,
    HillParams, HillSettings, RejectedDose, ScalingPolicy, ScalingRule, SimulationOptions,
    SimulationOutput,
};

pub mod prelude {
    pub use crate::analysis::{
        CoverageClass, CoverageSummary, GapInterval, SleepSensitivity, Window, WindowKind,
    };
    pub use crate::data::{
        profile_map, Category, Dose, EffectScale, Formulation, ProfileMap, SubstanceProfile,
        TimeGrid,
    };
    pub use crate::error::SimulationError;
    pub use crate::simulator::{
        simulate, CombinedTimeline, EffectCurve, HillParams, ScalingPolicy, ScalingRule,
        SimulationOptions, SimulationOutput,
    };
}
