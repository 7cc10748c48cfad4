use super::*;
use crate::foundation::core::Landmark;

fn hand_at(x: f64) -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); hand_index::HAND_LEN];
    points[hand_index::INDEX_TIP] = Landmark::new(x, 0.4, 0.0);
    LandmarkSet::new(points)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn leftward_motion_advances_and_rightward_retreats() {
    let mut nav = SwipeNavigator::new(GestureConfig::default());
    assert_eq!(nav.observe(Some(&hand_at(0.60)), ms(0)), None);
    assert_eq!(nav.observe(Some(&hand_at(0.55)), ms(30)), Some(1));

    let mut nav = SwipeNavigator::new(GestureConfig::default());
    nav.observe(Some(&hand_at(0.40)), ms(0));
    assert_eq!(nav.observe(Some(&hand_at(0.45)), ms(30)), Some(-1));
}

#[test]
fn small_motion_is_ignored_and_tracked() {
    let mut nav = SwipeNavigator::new(GestureConfig::default());
    nav.observe(Some(&hand_at(0.50)), ms(0));
    assert_eq!(nav.observe(Some(&hand_at(0.47)), ms(30)), None);
    assert_eq!(nav.previous_x(), Some(0.47));
}

#[test]
fn cooldown_blocks_and_clears_the_reference() {
    let mut nav = SwipeNavigator::new(GestureConfig::default());
    nav.observe(Some(&hand_at(0.60)), ms(0));
    assert_eq!(nav.observe(Some(&hand_at(0.50)), ms(30)), Some(1));
    assert_eq!(nav.previous_x(), None);

    assert_eq!(nav.observe(Some(&hand_at(0.30)), ms(500)), None);
    assert_eq!(nav.previous_x(), None);

    // After cooldown the first sample only re-seeds the reference.
    assert_eq!(nav.observe(Some(&hand_at(0.30)), ms(900)), None);
    assert_eq!(nav.previous_x(), Some(0.30));
    assert_eq!(nav.observe(Some(&hand_at(0.20)), ms(930)), Some(1));
}

#[test]
fn losing_the_hand_clears_the_reference() {
    let mut nav = SwipeNavigator::new(GestureConfig::default());
    nav.observe(Some(&hand_at(0.60)), ms(0));
    assert_eq!(nav.observe(None, ms(30)), None);
    assert_eq!(nav.observe(Some(&hand_at(0.40)), ms(60)), None);
}

#[test]
fn short_hand_set_counts_as_no_hand() {
    let mut nav = SwipeNavigator::new(GestureConfig::default());
    nav.observe(Some(&hand_at(0.60)), ms(0));
    let stub = LandmarkSet::new(vec![Landmark::new(0.1, 0.1, 0.0); 3]);
    assert_eq!(nav.observe(Some(&stub), ms(30)), None);
    assert_eq!(nav.previous_x(), None);
}

#[test]
fn wrap_index_wraps_both_ways() {
    assert_eq!(wrap_index(Some(0), -1, 6), Some(5));
    assert_eq!(wrap_index(Some(5), 1, 6), Some(0));
    assert_eq!(wrap_index(None, 1, 6), Some(1));
    assert_eq!(wrap_index(None, -1, 6), Some(5));
    assert_eq!(wrap_index(Some(2), 1, 0), None);
}
