//! Analysis result and configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a window's threshold predicate tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    /// Combined effect at or below the sleep threshold
    Sleep,
    /// Combined effect at or above the peak threshold fraction of the maximum
    Peak,
}

/// Contiguous interval on the grid satisfying a threshold predicate
///
/// `[start, end]` is closed on the sampled grid. Windows touching the horizon
/// boundaries carry open-ended flags, since the true state before 0:00 or
/// after 24:00 is unknown to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub kind: WindowKind,
    /// Start time in minutes
    pub start: f64,
    /// End time in minutes (inclusive, last qualifying sample)
    pub end: f64,
    /// Window starts at t = 0; its true beginning is unknown
    pub open_start: bool,
    /// Window runs to the last sample; its true end is unknown
    pub open_end: bool,
}

impl Window {
    /// Window length in minutes
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            WindowKind::Sleep => "sleep",
            WindowKind::Peak => "peak",
        };
        write!(
            f,
            "{} window {}{:.0}–{:.0}{} min",
            kind,
            if self.open_start { "(open) " } else { "" },
            self.start,
            self.end,
            if self.open_end { " (open)" } else { "" },
        )
    }
}

/// Caller-side sleep sensitivity tiers
///
/// Convenience mapping to representative numeric thresholds; the window
/// analyzer itself only consumes the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepSensitivity {
    /// Threshold around 0.01–0.2
    VerySensitive,
    /// Threshold around 0.2–0.5
    ModeratelySensitive,
    /// Threshold around 0.5–1.0
    Tolerant,
    /// Threshold above 1.0
    VeryTolerant,
}

impl SleepSensitivity {
    /// Representative threshold for this tier
    pub fn threshold(&self) -> f64 {
        match self {
            SleepSensitivity::VerySensitive => 0.1,
            SleepSensitivity::ModeratelySensitive => 0.3,
            SleepSensitivity::Tolerant => 0.7,
            SleepSensitivity::VeryTolerant => 1.2,
        }
    }
}

/// A stretch where coverage drops below the target between two doses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapInterval {
    /// Gap start in minutes
    pub start: f64,
    /// Gap end in minutes
    pub end: f64,
    /// Id of the dose preceding the gap (by administration order)
    pub after_dose: usize,
    /// Id of the dose following the gap
    pub before_dose: usize,
}

impl GapInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Overall coverage quality over the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageClass {
    /// No time at or above the target
    NoCoverage,
    /// Less than 8 h above the target
    Fragmented,
    /// At least 8 h above the target
    Good,
    /// At least 12 h above the target
    Excellent,
}

impl fmt::Display for CoverageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageClass::NoCoverage => write!(f, "no coverage"),
            CoverageClass::Fragmented => write!(f, "fragmented coverage"),
            CoverageClass::Good => write!(f, "good coverage"),
            CoverageClass::Excellent => write!(f, "excellent coverage"),
        }
    }
}

/// Summary statistics consumed by the recommendation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Target the summary was computed against
    pub target_threshold: f64,
    /// Total minutes with combined effect at or above the target
    pub minutes_above_target: f64,
    /// Sub-target stretches between doses
    pub gaps: Vec<GapInterval>,
    /// Per-gap classification strings ("gap > 120 min between doses 1 and 2")
    pub notes: Vec<String>,
    /// Overall classification
    pub classification: CoverageClass,
}
