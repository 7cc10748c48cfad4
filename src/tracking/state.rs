use crate::config::SmoothingConfig;
use crate::render::view::ViewTransform;
use crate::tracking::geometry::{GeometryResolver, HeadGeometry};
use crate::tracking::landmarks::LandmarkSet;
use crate::tracking::smoother::{Filter, LandmarkSmoother};

/// A face as seen by the renderer: smoothed landmarks plus resolved geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedFace {
    /// Smoothed landmarks.
    pub landmarks: LandmarkSet,
    /// Anchors, ear distance and tilt.
    pub geometry: HeadGeometry,
}

/// All temporal state of one tracking session.
///
/// Set while a face is tracked, cleared on the first frame without one. Clearing drops the filter
/// history as well, so the next detection re-seeds from scratch instead of decaying from a stale
/// position.
#[derive(Clone, Debug)]
pub struct SmoothedState {
    smoother: LandmarkSmoother,
    resolver: GeometryResolver,
    current: Option<TrackedFace>,
}

impl SmoothedState {
    /// Untracked state with fresh filters.
    pub fn new(cfg: &SmoothingConfig) -> Self {
        Self {
            smoother: LandmarkSmoother::new(cfg.landmark_alpha),
            resolver: GeometryResolver::new(cfg),
            current: None,
        }
    }

    /// Feed one detector result. `None` (no face) resets the state.
    pub fn update(
        &mut self,
        face: Option<LandmarkSet>,
        view: &ViewTransform,
    ) -> Option<&TrackedFace> {
        let Some(raw) = face else {
            self.reset();
            return None;
        };

        let landmarks = self.smoother.push(raw);
        match self.resolver.resolve(&landmarks, view) {
            Some(geometry) => {
                self.current = Some(TrackedFace {
                    landmarks,
                    geometry,
                });
                self.current.as_ref()
            }
            None => {
                tracing::debug!(
                    len = landmarks.len(),
                    "face landmark set lacks anchor indices; treating as untracked"
                );
                self.reset();
                None
            }
        }
    }

    /// Tracked face, if any.
    pub fn current(&self) -> Option<&TrackedFace> {
        self.current.as_ref()
    }

    /// Whether a face is tracked.
    pub fn is_tracked(&self) -> bool {
        self.current.is_some()
    }

    /// Forget the face and all filter history.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.resolver.reset();
        self.current = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/state.rs"]
mod tests;
