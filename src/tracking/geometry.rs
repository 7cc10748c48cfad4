use crate::config::SmoothingConfig;
use crate::foundation::core::Point;
use crate::render::view::ViewTransform;
use crate::tracking::landmarks::{LandmarkSet, face_index};
use crate::tracking::smoother::{AngleEma, AngleMedian, Ema, Filter};

/// Canvas-space anchors and derived measurements for one tracked face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadGeometry {
    /// Left ear anchor in canvas pixels.
    pub left_ear: Point,
    /// Right ear anchor in canvas pixels.
    pub right_ear: Point,
    /// Neck anchor in canvas pixels.
    pub neck: Point,
    /// Smoothed inter-ear distance in canvas pixels.
    pub ear_distance: f64,
    /// Smoothed, median-filtered head roll in radians, `(-PI, PI]`.
    pub tilt: f64,
}

/// Derives [`HeadGeometry`] from smoothed landmarks.
///
/// Distance and tilt get their own filters on top of the landmark smoothing; both are far more
/// sensitive to jitter than the individual points they are computed from.
#[derive(Clone, Debug)]
pub struct GeometryResolver {
    distance: Ema,
    angle: AngleEma,
    median: AngleMedian,
}

impl GeometryResolver {
    /// Resolver with fresh filters.
    pub fn new(cfg: &SmoothingConfig) -> Self {
        Self {
            distance: Ema::new(cfg.distance_alpha),
            angle: AngleEma::new(cfg.angle_alpha),
            median: AngleMedian::new(cfg.angle_window),
        }
    }

    /// Resolve anchors from `landmarks`. Returns `None` (without touching filter state) if any
    /// anchor index is missing from the set.
    pub fn resolve(
        &mut self,
        landmarks: &LandmarkSet,
        view: &ViewTransform,
    ) -> Option<HeadGeometry> {
        let left_ear = view.map(landmarks.get(face_index::LEFT_EAR)?);
        let right_ear = view.map(landmarks.get(face_index::RIGHT_EAR)?);
        let neck = view.map(landmarks.get(face_index::NECK)?);

        let raw_distance = (right_ear - left_ear).hypot();
        let raw_tilt = view.tilt(left_ear, right_ear);

        let ear_distance = self.distance.push(raw_distance);
        let smoothed_tilt = self.angle.push(raw_tilt);
        let tilt = self.median.push(smoothed_tilt);

        Some(HeadGeometry {
            left_ear,
            right_ear,
            neck,
            ear_distance,
            tilt,
        })
    }

    /// Drop filter history.
    pub fn reset(&mut self) {
        self.distance.reset();
        self.angle.reset();
        self.median.reset();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/geometry.rs"]
mod tests;
