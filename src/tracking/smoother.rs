//! Temporal filters used to take detector jitter out of landmarks and derived scalars.
//!
//! Every filter follows the same convention: `alpha` is the weight kept from the previous output,
//! so `alpha = 0` disables smoothing. The first value after construction or [`Filter::reset`]
//! passes through unchanged.

use std::collections::VecDeque;

use crate::foundation::core::{Landmark, lerp_toward};
use crate::foundation::math::{angle_delta, circular_median, wrap_angle};
use crate::tracking::landmarks::LandmarkSet;

/// A stateful filter over values of type `V`.
pub trait Filter<V> {
    /// Feed a new observation, returning the filtered value.
    fn push(&mut self, value: V) -> V;

    /// Drop all history; the next pushed value re-seeds the filter.
    fn reset(&mut self);
}

/// Scalar exponential moving average.
#[derive(Clone, Debug)]
pub struct Ema {
    alpha: f64,
    last: Option<f64>,
}

impl Ema {
    /// Filter keeping `alpha` of the previous output.
    pub fn new(alpha: f64) -> Self {
        Self { alpha, last: None }
    }

    /// Last output.
    pub fn value(&self) -> Option<f64> {
        self.last
    }
}

impl Filter<f64> for Ema {
    fn push(&mut self, value: f64) -> f64 {
        let out = match self.last {
            Some(prev) => lerp_toward(prev, value, self.alpha),
            None => value,
        };
        self.last = Some(out);
        out
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Exponential moving average over an angle in radians.
///
/// Blends along the shortest arc between the previous output and the new sample, so crossing the
/// `±PI` seam moves by a few degrees instead of a full turn. Output is in `(-PI, PI]`.
#[derive(Clone, Debug)]
pub struct AngleEma {
    alpha: f64,
    last: Option<f64>,
}

impl AngleEma {
    /// Filter keeping `alpha` of the previous output.
    pub fn new(alpha: f64) -> Self {
        Self { alpha, last: None }
    }

    /// Last output.
    pub fn value(&self) -> Option<f64> {
        self.last
    }
}

impl Filter<f64> for AngleEma {
    fn push(&mut self, value: f64) -> f64 {
        let out = match self.last {
            Some(prev) => wrap_angle(prev + angle_delta(prev, value) * (1.0 - self.alpha)),
            None => wrap_angle(value),
        };
        self.last = Some(out);
        out
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Rolling circular median over the last `window` angles.
#[derive(Clone, Debug)]
pub struct AngleMedian {
    window: usize,
    history: VecDeque<f64>,
}

impl AngleMedian {
    /// Median over the last `window` samples (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Samples currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no sample is held.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Filter<f64> for AngleMedian {
    fn push(&mut self, value: f64) -> f64 {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(value);
        let samples: Vec<f64> = self.history.iter().copied().collect();
        circular_median(&samples).unwrap_or(value)
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}

/// Per-landmark exponential smoothing of whole landmark sets.
///
/// A set whose length differs from the held state re-seeds the filter instead of blending.
#[derive(Clone, Debug)]
pub struct LandmarkSmoother {
    alpha: f64,
    state: Option<LandmarkSet>,
}

impl LandmarkSmoother {
    /// Smoother keeping `alpha` of each previous landmark.
    pub fn new(alpha: f64) -> Self {
        Self { alpha, state: None }
    }

    /// The current smoothed set, or `None` while no face is tracked.
    pub fn state(&self) -> Option<&LandmarkSet> {
        self.state.as_ref()
    }
}

impl Filter<LandmarkSet> for LandmarkSmoother {
    fn push(&mut self, value: LandmarkSet) -> LandmarkSet {
        let out = match self.state.take() {
            Some(mut prev) if prev.len() == value.len() => {
                for (p, n) in prev.points_mut().iter_mut().zip(value.points()) {
                    *p = Landmark::blend(*p, *n, self.alpha);
                }
                prev
            }
            _ => value,
        };
        self.state = Some(out.clone());
        out
    }

    fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/smoother.rs"]
mod tests;
