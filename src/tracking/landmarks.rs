use crate::foundation::core::Landmark;
use crate::foundation::error::{TryOnError, TryOnResult};

/// Fixed indices into a face mesh landmark set (MediaPipe FaceMesh topology).
pub mod face_index {
    /// Ear anchor on the subject's right, image left.
    pub const LEFT_EAR: usize = 132;
    /// Ear anchor on the image right.
    pub const RIGHT_EAR: usize = 361;
    /// Neck anchor; the chin point.
    pub const NECK: usize = 152;

    /// Top of the forehead.
    pub const FOREHEAD: usize = 10;
    /// Bottom of the chin.
    pub const CHIN: usize = 152;
    /// Outer cheek, image left.
    pub const LEFT_CHEEK: usize = 234;
    /// Outer cheek, image right.
    pub const RIGHT_CHEEK: usize = 454;

    /// Outline points bounding the head for occlusion.
    pub const HEAD_OUTLINE: [usize; 4] = [FOREHEAD, CHIN, LEFT_CHEEK, RIGHT_CHEEK];

    /// Landmark count produced by the mesh without iris refinement.
    pub const MESH_LEN: usize = 468;
}

/// Fixed indices into a hand landmark set (MediaPipe Hands topology).
pub mod hand_index {
    /// Index fingertip.
    pub const INDEX_TIP: usize = 8;

    /// Landmark count of one hand.
    pub const HAND_LEN: usize = 21;
}

/// All landmarks of one detected face or hand in one frame, ordered by topological index.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap points in topological order.
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Parse a JSON array of `{x, y, z}` objects.
    pub fn from_json_str(s: &str) -> TryOnResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| TryOnError::validation(format!("invalid landmark json: {e}")))
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// All points.
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Landmark] {
        &mut self.points
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/landmarks.rs"]
mod tests;
