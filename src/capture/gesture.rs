use std::time::Duration;

use crate::config::GestureConfig;
use crate::tracking::landmarks::{LandmarkSet, hand_index};

/// Turns horizontal index-fingertip motion into `+1` / `-1` navigation steps.
///
/// Coordinates are raw camera coordinates: moving the fingertip toward smaller `x` advances.
#[derive(Clone, Debug)]
pub struct SwipeNavigator {
    cfg: GestureConfig,
    previous_x: Option<f64>,
    last_swipe: Option<Duration>,
}

impl SwipeNavigator {
    /// Navigator with no reference sample.
    pub fn new(cfg: GestureConfig) -> Self {
        Self {
            cfg,
            previous_x: None,
            last_swipe: None,
        }
    }

    /// Feed the hand result of one detection. Returns the navigation step, if a swipe completed.
    pub fn observe(&mut self, hand: Option<&LandmarkSet>, now: Duration) -> Option<i32> {
        let Some(tip) = hand.and_then(|h| h.get(hand_index::INDEX_TIP)) else {
            // Cleared on loss so a hand re-entering elsewhere never reads as a swipe.
            self.previous_x = None;
            return None;
        };

        let since_swipe = self.last_swipe.map(|t| now.saturating_sub(t));
        if since_swipe.is_some_and(|d| d < Duration::from_millis(self.cfg.cooldown_ms)) {
            return None;
        }

        let mut step = None;
        if let Some(prev) = self.previous_x {
            let diff = tip.x - prev;
            if diff < -self.cfg.swipe_threshold {
                step = Some(1);
            } else if diff > self.cfg.swipe_threshold {
                step = Some(-1);
            }
            if step.is_some() {
                tracing::debug!(diff, ?step, "swipe recognized");
                self.last_swipe = Some(now);
                self.previous_x = None;
            }
        }

        let quiet = self
            .last_swipe
            .is_none_or(|t| now.saturating_sub(t) > Duration::from_millis(self.cfg.resample_ms));
        if quiet {
            self.previous_x = Some(tip.x);
        }
        step
    }

    /// Forget the reference sample, e.g. when navigation is suspended.
    pub fn reset(&mut self) {
        self.previous_x = None;
    }

    /// Reference fingertip `x`, if one is held.
    pub fn previous_x(&self) -> Option<f64> {
        self.previous_x
    }
}

/// Step `current` by `delta` within `0..len`, wrapping. An unselected index counts as `0`.
pub fn wrap_index(current: Option<usize>, delta: i32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len_i = len as i64;
    let idx = current.unwrap_or(0) as i64;
    Some((idx + i64::from(delta)).rem_euclid(len_i) as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/gesture.rs"]
mod tests;
