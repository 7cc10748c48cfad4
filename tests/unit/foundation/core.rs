use super::*;

#[test]
fn canvas_rejects_empty_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(4, 3).unwrap();
    assert_eq!(c.pixel_count(), 12);
    assert_eq!(c.byte_len_rgba8(), 48);
    assert_eq!(c.bounds(), Rect::new(0.0, 0.0, 4.0, 3.0));
}

#[test]
fn landmark_blend_is_convex() {
    let a = Landmark::new(0.0, 1.0, 0.5);
    let b = Landmark::new(1.0, 0.0, 0.5);
    let m = Landmark::blend(a, b, 0.7);
    assert!((m.x - 0.3).abs() < 1e-12);
    assert!((m.y - 0.7).abs() < 1e-12);
    assert!((m.z - 0.5).abs() < 1e-12);
}

#[test]
fn landmark_blend_of_equal_points_is_a_fixed_point() {
    let a = Landmark::new(0.25, 0.75, -0.1);
    assert_eq!(Landmark::blend(a, a, 0.7), a);
}

#[test]
fn landmark_z_defaults_when_missing_in_json() {
    let l: Landmark = serde_json::from_str(r#"{"x":0.5,"y":0.25}"#).unwrap();
    assert_eq!(l, Landmark::new(0.5, 0.25, 0.0));
}
