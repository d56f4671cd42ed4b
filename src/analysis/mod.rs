//! Derived summaries over the combined timeline
//!
//! Window scanning ([`find_sleep_windows`], [`find_peak_windows`]) and
//! coverage reporting ([`report`]) are pure functions of the timeline;
//! everything here is recomputed from scratch on each pipeline invocation.

pub mod coverage;
pub mod types;
pub mod windows;

pub use coverage::{report, DoseSpan};
pub use types::{
    CoverageClass, CoverageSummary, GapInterval, SleepSensitivity, Window, WindowKind,
};
pub use windows::{find_peak_windows, find_sleep_windows};
