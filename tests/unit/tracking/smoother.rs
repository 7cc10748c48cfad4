use super::*;

use std::f64::consts::PI;

use proptest::prelude::*;

fn set(points: &[(f64, f64)]) -> LandmarkSet {
    points
        .iter()
        .map(|&(x, y)| Landmark::new(x, y, 0.0))
        .collect()
}

#[test]
fn ema_first_value_passes_through() {
    let mut f = Ema::new(0.9);
    assert_eq!(f.push(10.0), 10.0);
    assert!((f.push(20.0) - 11.0).abs() < 1e-12);
}

#[test]
fn ema_reset_reseeds() {
    let mut f = Ema::new(0.5);
    f.push(1.0);
    f.push(3.0);
    f.reset();
    assert_eq!(f.value(), None);
    assert_eq!(f.push(7.0), 7.0);
}

#[test]
fn angle_ema_crosses_the_seam_the_short_way() {
    let mut f = AngleEma::new(0.82);
    let start = 179f64.to_radians();
    f.push(start);
    let out = f.push((-179f64).to_radians());
    let moved = angle_delta(start, out);
    assert!(moved > 0.0);
    assert!((moved - 2f64.to_radians() * 0.18).abs() < 1e-9);
    assert!(out > -PI && out <= PI);
}

#[test]
fn angle_median_drops_single_frame_outlier() {
    let mut f = AngleMedian::new(5);
    for a in [0.1, 0.1, 0.1, 0.1] {
        f.push(a);
    }
    let out = f.push(2.5);
    assert!((out - 0.1).abs() < 1e-12);
    assert_eq!(f.len(), 5);
}

#[test]
fn angle_median_window_is_bounded() {
    let mut f = AngleMedian::new(3);
    for a in [0.0, 0.0, 0.0, 1.0, 1.0] {
        f.push(a);
    }
    assert_eq!(f.len(), 3);
    assert!((f.push(1.0) - 1.0).abs() < 1e-12);
}

#[test]
fn landmark_smoother_first_observation_is_unsmoothed() {
    let mut s = LandmarkSmoother::new(0.7);
    let raw = set(&[(0.2, 0.4), (0.6, 0.8)]);
    assert_eq!(s.push(raw.clone()), raw);
}

#[test]
fn landmark_smoother_blends_with_previous() {
    let mut s = LandmarkSmoother::new(0.7);
    s.push(set(&[(0.0, 0.0)]));
    let out = s.push(set(&[(1.0, 1.0)]));
    let p = out.get(0).unwrap();
    assert!((p.x - 0.3).abs() < 1e-12);
    assert!((p.y - 0.3).abs() < 1e-12);
}

#[test]
fn landmark_smoother_reset_then_passes_through() {
    let mut s = LandmarkSmoother::new(0.7);
    s.push(set(&[(0.0, 0.0)]));
    s.reset();
    assert!(s.state().is_none());
    let raw = set(&[(0.9, 0.9)]);
    assert_eq!(s.push(raw.clone()), raw);
}

#[test]
fn landmark_smoother_reseeds_on_topology_change() {
    let mut s = LandmarkSmoother::new(0.7);
    s.push(set(&[(0.0, 0.0)]));
    let raw = set(&[(0.5, 0.5), (0.6, 0.6)]);
    assert_eq!(s.push(raw.clone()), raw);
}

proptest! {
    #[test]
    fn identical_input_is_a_fixed_point(
        pts in proptest::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..16),
        alpha in 0.0f64..0.99,
    ) {
        let raw = set(&pts);
        let mut s = LandmarkSmoother::new(alpha);
        s.push(raw.clone());
        prop_assert_eq!(s.push(raw.clone()), raw);
    }

    #[test]
    fn angle_ema_output_in_range(
        samples in proptest::collection::vec(-20.0f64..20.0, 1..32),
        alpha in 0.0f64..0.99,
    ) {
        let mut f = AngleEma::new(alpha);
        for a in samples {
            let out = f.push(a);
            prop_assert!(out > -PI && out <= PI);
        }
    }
}
