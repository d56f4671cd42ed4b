//! Window scanning over the combined timeline
//!
//! Both modes are maximal-run scans over the sampled grid. Runs separated by
//! even a single non-qualifying sample stay separate; gap detection is exact
//! at the grid resolution, which is why the default grid is one minute.

use crate::analysis::types::{Window, WindowKind};
use crate::simulator::CombinedTimeline;

/// Maximal contiguous runs where `predicate(value)` holds
///
/// Returns `(first_sample, last_sample)` index pairs, inclusive.
fn scan_runs<F>(timeline: &CombinedTimeline, predicate: F) -> Vec<(usize, usize)>
where
    F: Fn(f64) -> bool,
{
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &value) in timeline.values.iter().enumerate() {
        match (predicate(value), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, timeline.len() - 1));
    }
    runs
}

fn runs_to_windows(
    timeline: &CombinedTimeline,
    runs: Vec<(usize, usize)>,
    kind: WindowKind,
    min_length: f64,
) -> Vec<Window> {
    let last = timeline.len() - 1;
    runs.into_iter()
        .filter_map(|(s, e)| {
            let window = Window {
                kind,
                start: timeline.times[s],
                end: timeline.times[e],
                open_start: s == 0,
                open_end: e == last,
            };
            (window.duration() >= min_length).then_some(window)
        })
        .collect()
}

/// Find sleep-eligible windows: combined effect at or below `threshold`
///
/// A run qualifies only if it spans at least `min_length` minutes. The
/// threshold comes from the caller's sensitivity tier (see
/// [`SleepSensitivity`](crate::analysis::SleepSensitivity)).
pub fn find_sleep_windows(
    timeline: &CombinedTimeline,
    threshold: f64,
    min_length: f64,
) -> Vec<Window> {
    if timeline.is_empty() {
        return Vec::new();
    }
    let runs = scan_runs(timeline, |v| v <= threshold);
    runs_to_windows(timeline, runs, WindowKind::Sleep, min_length)
}

/// Find peak-effect windows: combined effect at or above
/// `threshold_fraction · max(combined)`
///
/// Returns nothing when the timeline is entirely flat at zero, since a peak
/// relative to no effect is meaningless.
pub fn find_peak_windows(
    timeline: &CombinedTimeline,
    threshold_fraction: f64,
    min_length: f64,
) -> Vec<Window> {
    if timeline.is_empty() {
        return Vec::new();
    }
    let max = timeline.max();
    if max <= 0.0 {
        return Vec::new();
    }
    let threshold = threshold_fraction * max;
    let runs = scan_runs(timeline, |v| v >= threshold);
    runs_to_windows(timeline, runs, WindowKind::Peak, min_length)
}
