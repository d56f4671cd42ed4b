//! Curve shape and multi-dose scaling properties
//!
//! Covers the trapezoid phases (zero at administration, peak at onset, zero
//! at wear-off, monotone rise and decay) and the formulation-specific
//! quantity scaling factors.

use approx::assert_relative_eq;
use pharmtime::prelude::*;
use pharmtime::{effect_at, generate_curve};

fn ir_medication() -> SubstanceProfile {
    SubstanceProfile::new(
        "methylphenidate_20mg_ir",
        Category::Medication,
        Formulation::ImmediateRelease,
        20.0,
        60.0,
        0.0,
        240.0,
        0.8,
    )
    .unwrap()
}

fn mr_painkiller() -> SubstanceProfile {
    SubstanceProfile::new(
        "tramadol_100mg_mr",
        Category::Painkiller,
        Formulation::ModifiedRelease,
        60.0,
        240.0,
        180.0,
        720.0,
        7.0,
    )
    .unwrap()
}

#[test]
fn trapezoid_hits_its_landmarks() {
    let profile = ir_medication();
    let policy = ScalingPolicy::default();
    let params = policy
        .effective_params(&profile, &Dose::new(480.0, "methylphenidate_20mg_ir"))
        .unwrap();

    // curve(administration) = 0, curve(administration + onset) = peak,
    // curve(administration + total) = 0
    assert_eq!(effect_at(&params, 0.0), 0.0);
    assert_relative_eq!(effect_at(&params, 20.0), 0.8);
    assert_eq!(effect_at(&params, 240.0), 0.0);
}

#[test]
fn rise_and_decay_are_monotone() {
    let profile = ir_medication();
    let params = ScalingPolicy::default()
        .effective_params(&profile, &Dose::new(0.0, "methylphenidate_20mg_ir"))
        .unwrap();

    let mut last = -1.0;
    for e in 0..=20 {
        let v = effect_at(&params, e as f64);
        assert!(v >= last, "rise must be non-decreasing at e={}", e);
        last = v;
    }
    for e in 20..=240 {
        let v = effect_at(&params, e as f64);
        assert!(v <= last, "decay must be non-increasing at e={}", e);
        last = v;
    }
}

#[test]
fn sampled_curve_is_zero_outside_the_active_interval() {
    let profile = ir_medication();
    let params = ScalingPolicy::default()
        .effective_params(&profile, &Dose::new(480.0, "methylphenidate_20mg_ir"))
        .unwrap();
    let grid = TimeGrid::default();
    let curve = generate_curve(0, "test".to_string(), &params, 480.0, &grid, false);

    for i in 0..480 {
        assert_eq!(curve.values[i], 0.0);
    }
    for i in 720..1440 {
        assert_eq!(curve.values[i], 0.0);
    }
    assert!(curve.values[540] > 0.0);
}

#[test]
fn immediate_release_triple_dose_scales_peak_by_1_8() {
    let profile = ir_medication();
    let dose = Dose::new(480.0, "methylphenidate_20mg_ir").with_quantity(3);
    let params = ScalingPolicy::default()
        .effective_params(&profile, &dose)
        .unwrap();

    assert_relative_eq!(params.peak_effect, 0.8 * 1.8);
    assert_relative_eq!(params.total_duration, 240.0);
    assert_relative_eq!(params.onset_time, 20.0);
}

#[test]
fn modified_release_triple_dose_scales_duration_by_1_6() {
    let profile = mr_painkiller();
    let dose = Dose::new(480.0, "tramadol_100mg_mr").with_quantity(3);
    let params = ScalingPolicy::default()
        .effective_params(&profile, &dose)
        .unwrap();

    assert_relative_eq!(params.total_duration, 720.0 * 1.6);
    assert_relative_eq!(params.plateau_duration, 180.0 * 1.6);
    assert_relative_eq!(params.peak_effect, 7.0);
}

#[test]
fn overrides_take_precedence_over_scaled_defaults() {
    let profile = mr_painkiller();
    let dose = Dose::new(480.0, "tramadol_100mg_mr")
        .with_quantity(3)
        .with_total_duration(800.0);
    let params = ScalingPolicy::default()
        .effective_params(&profile, &dose)
        .unwrap();

    // Scaling would give 1152; the explicit override wins
    assert_relative_eq!(params.total_duration, 800.0);
    // Plateau keeps its scaled value; the combination is still valid
    assert_relative_eq!(params.plateau_duration, 180.0 * 1.6);
}

#[test]
fn truncation_at_the_horizon_boundary() {
    let profile = ir_medication();
    let params = ScalingPolicy::default()
        .effective_params(&profile, &Dose::new(1320.0, "methylphenidate_20mg_ir"))
        .unwrap();
    let grid = TimeGrid::default();
    let curve = generate_curve(0, "late".to_string(), &params, 1320.0, &grid, false);

    // Dose at 22:00 lasting 4 h: active through the end of the horizon,
    // nothing wraps back to the morning
    assert_eq!(curve.values[0], 0.0);
    assert!(curve.values[1439] > 0.0);
}
