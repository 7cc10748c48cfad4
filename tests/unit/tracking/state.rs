use super::*;

use crate::foundation::core::{Canvas, Landmark};
use crate::tracking::landmarks::face_index;

fn face(dx: f64) -> LandmarkSet {
    let mut pts = vec![Landmark::new(0.5, 0.5, 0.0); face_index::MESH_LEN];
    pts[face_index::LEFT_EAR] = Landmark::new(0.4 + dx, 0.5, 0.0);
    pts[face_index::RIGHT_EAR] = Landmark::new(0.6 + dx, 0.5, 0.0);
    pts[face_index::NECK] = Landmark::new(0.5 + dx, 0.8, 0.0);
    LandmarkSet::new(pts)
}

fn view() -> ViewTransform {
    ViewTransform::new(Canvas::new(100, 100).unwrap(), false)
}

#[test]
fn untracked_frame_clears_state() {
    let mut s = SmoothedState::new(&SmoothingConfig::default());
    assert!(s.update(Some(face(0.0)), &view()).is_some());
    assert!(s.is_tracked());
    assert!(s.update(None, &view()).is_none());
    assert!(!s.is_tracked());
    assert!(s.current().is_none());
}

#[test]
fn detection_after_gap_passes_through_unsmoothed() {
    let mut s = SmoothedState::new(&SmoothingConfig::default());
    s.update(Some(face(0.0)), &view());
    s.update(None, &view());
    let raw = face(0.2);
    let tracked = s.update(Some(raw.clone()), &view()).unwrap();
    assert_eq!(tracked.landmarks, raw);
    assert!((tracked.geometry.left_ear.x - 60.0).abs() < 1e-9);
}

#[test]
fn consecutive_detections_are_smoothed() {
    let mut s = SmoothedState::new(&SmoothingConfig::default());
    s.update(Some(face(0.0)), &view());
    let tracked = s.update(Some(face(0.1)), &view()).unwrap();
    // 40 * 0.7 + 50 * 0.3
    assert!((tracked.geometry.left_ear.x - 43.0).abs() < 1e-9);
}

#[test]
fn set_without_anchors_counts_as_no_face() {
    let mut s = SmoothedState::new(&SmoothingConfig::default());
    s.update(Some(face(0.0)), &view());
    let short = LandmarkSet::new(vec![Landmark::default(); 3]);
    assert!(s.update(Some(short), &view()).is_none());
    assert!(!s.is_tracked());
}
