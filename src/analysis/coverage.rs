//! Coverage reporting: time above target and gaps between doses
//!
//! Pure derived reporting over the combined timeline; the interval scanning
//! is the same maximal-run machinery used for window analysis.

use crate::analysis::types::{CoverageClass, CoverageSummary, GapInterval};
use crate::simulator::CombinedTimeline;

/// Active span of one dose on the timeline, used to attribute gaps
#[derive(Debug, Clone, PartialEq)]
pub struct DoseSpan {
    /// Index of the dose in the input dose list
    pub dose_id: usize,
    /// Administration time in minutes
    pub start: f64,
    /// End of effect (administration + effective total duration), possibly
    /// past the horizon
    pub end: f64,
}

/// Gap duration above which a note calls the gap out explicitly
const LONG_GAP_MINUTES: f64 = 120.0;

/// Summarize coverage of the combined timeline against `target_threshold`
///
/// Reports total minutes at or above the target, every sub-target stretch
/// lying between two doses (attributed to its neighbours in administration
/// order), per-gap classification strings, and an overall coverage class.
pub fn report(
    timeline: &CombinedTimeline,
    spans: &[DoseSpan],
    target_threshold: f64,
) -> CoverageSummary {
    let minutes_above_target = timeline
        .values
        .iter()
        .filter(|&&v| v >= target_threshold)
        .count() as f64
        * timeline.step;

    let gaps = find_gaps(timeline, spans, target_threshold);

    let mut notes = Vec::with_capacity(gaps.len());
    for gap in &gaps {
        let (a, b) = dose_positions(spans, gap);
        if gap.duration() > LONG_GAP_MINUTES {
            notes.push(format!(
                "gap > {:.0} min between doses {} and {}",
                LONG_GAP_MINUTES, a, b
            ));
        } else {
            notes.push(format!(
                "gap of {:.0} min between doses {} and {}",
                gap.duration(),
                a,
                b
            ));
        }
    }

    let classification = if minutes_above_target <= 0.0 {
        CoverageClass::NoCoverage
    } else if minutes_above_target >= 720.0 {
        CoverageClass::Excellent
    } else if minutes_above_target >= 480.0 {
        CoverageClass::Good
    } else {
        CoverageClass::Fragmented
    };

    CoverageSummary {
        target_threshold,
        minutes_above_target,
        gaps,
        notes,
        classification,
    }
}

/// Sub-target runs bounded by a dose on each side
fn find_gaps(
    timeline: &CombinedTimeline,
    spans: &[DoseSpan],
    target_threshold: f64,
) -> Vec<GapInterval> {
    if spans.len() < 2 || timeline.is_empty() {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    let mut run_start: Option<usize> = None;

    for i in 0..=timeline.len() {
        let below = i < timeline.len() && timeline.values[i] < target_threshold;
        match (below, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(s)) => {
                let start = timeline.times[s];
                let end = timeline.times[i - 1];
                if let Some(gap) = attribute_gap(spans, start, end) {
                    gaps.push(gap);
                }
                run_start = None;
            }
            _ => {}
        }
    }
    gaps
}

/// Attribute a sub-target run to its neighbouring doses, if it has both
///
/// Runs before the first dose or after the last dose's onset window are not
/// between-dose gaps and are dropped.
fn attribute_gap(spans: &[DoseSpan], start: f64, end: f64) -> Option<GapInterval> {
    let after = spans
        .iter()
        .filter(|s| s.start <= start)
        .max_by(|a, b| a.start.total_cmp(&b.start))?;
    let before = spans
        .iter()
        .filter(|s| s.start > start)
        .min_by(|a, b| a.start.total_cmp(&b.start))?;

    Some(GapInterval {
        start,
        end,
        after_dose: after.dose_id,
        before_dose: before.dose_id,
    })
}

/// 1-based positions of a gap's neighbours in administration order
fn dose_positions(spans: &[DoseSpan], gap: &GapInterval) -> (usize, usize) {
    let mut order: Vec<usize> = spans.iter().map(|s| s.dose_id).collect();
    order.sort_by(|&a, &b| {
        let sa = spans.iter().find(|s| s.dose_id == a).map(|s| s.start);
        let sb = spans.iter().find(|s| s.dose_id == b).map(|s| s.start);
        sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
    });
    let pos = |id: usize| order.iter().position(|&d| d == id).map_or(0, |p| p + 1);
    (pos(gap.after_dose), pos(gap.before_dose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn timeline(values: Vec<f64>) -> CombinedTimeline {
        let n = values.len();
        CombinedTimeline {
            times: Array1::from_iter((0..n).map(|i| i as f64)),
            values: Array1::from_vec(values),
            contributors: vec![Vec::new(); n],
            step: 1.0,
        }
    }

    #[test]
    fn time_above_target_counts_samples() {
        let t = timeline(vec![0.0, 0.5, 0.5, 0.5, 0.1]);
        let summary = report(&t, &[], 0.4);
        assert_eq!(summary.minutes_above_target, 3.0);
        assert_eq!(summary.classification, CoverageClass::Fragmented);
    }

    #[test]
    fn no_coverage_class() {
        let t = timeline(vec![0.0; 10]);
        let summary = report(&t, &[], 0.5);
        assert_eq!(summary.classification, CoverageClass::NoCoverage);
        assert!(summary.gaps.is_empty());
    }

    #[test]
    fn gap_between_two_doses_is_attributed() {
        // Dose 0 covers [0, 40), dose 1 covers [60, 100); trough between
        let mut values = vec![0.8; 100];
        for v in values.iter_mut().take(60).skip(40) {
            *v = 0.1;
        }
        let t = timeline(values);
        let spans = vec![
            DoseSpan {
                dose_id: 0,
                start: 0.0,
                end: 40.0,
            },
            DoseSpan {
                dose_id: 1,
                start: 60.0,
                end: 100.0,
            },
        ];
        let summary = report(&t, &spans, 0.5);
        assert_eq!(summary.gaps.len(), 1);
        let gap = &summary.gaps[0];
        assert_eq!(gap.after_dose, 0);
        assert_eq!(gap.before_dose, 1);
        assert_eq!(gap.start, 40.0);
        assert_eq!(gap.end, 59.0);
        assert_eq!(summary.notes.len(), 1);
        assert!(summary.notes[0].contains("between doses 1 and 2"));
    }

    #[test]
    fn tail_after_last_dose_is_not_a_gap() {
        let mut values = vec![0.8; 100];
        for v in values.iter_mut().skip(80) {
            *v = 0.0;
        }
        let t = timeline(values);
        let spans = vec![
            DoseSpan {
                dose_id: 0,
                start: 0.0,
                end: 50.0,
            },
            DoseSpan {
                dose_id: 1,
                start: 40.0,
                end: 80.0,
            },
        ];
        let summary = report(&t, &spans, 0.5);
        assert!(summary.gaps.is_empty());
    }

    #[test]
    fn long_gap_note_format() {
        let mut values = vec![0.8; 400];
        for v in values.iter_mut().take(330).skip(100) {
            *v = 0.0;
        }
        let t = timeline(values);
        let spans = vec![
            DoseSpan {
                dose_id: 0,
                start: 0.0,
                end: 100.0,
            },
            DoseSpan {
                dose_id: 1,
                start: 330.0,
                end: 400.0,
            },
        ];
        let summary = report(&t, &spans, 0.5);
        assert_eq!(summary.gaps.len(), 1);
        assert!(summary.notes[0].starts_with("gap > 120 min"));
    }
}
