use crate::config::PlacementConfig;
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::tracking::geometry::HeadGeometry;

/// Where on the body an asset is worn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// A pair, one per ear.
    Earrings,
    /// One piece below the neck.
    Necklace,
}

impl Slot {
    /// Slot driven by a category id: ids mentioning earrings drive the earring slot, everything
    /// else the necklace slot.
    pub fn for_category(category_id: &str) -> Self {
        if category_id.to_ascii_lowercase().contains("earring") {
            Self::Earrings
        } else {
            Self::Necklace
        }
    }
}

/// Canvas-space draw rectangle for one asset instance.
///
/// `(x, y)` is the top-left corner of the unrotated rectangle; `rotation` (radians) turns the
/// rectangle about its own center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementTransform {
    /// Left edge before rotation.
    pub x: f64,
    /// Top edge before rotation.
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
    /// Roll in radians about the center.
    pub rotation: f64,
}

impl PlacementTransform {
    /// Center of the unrotated box.
    pub fn center(&self) -> Point {
        Point::new(self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    /// The unrotated draw rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Affine from the asset's natural pixel space into canvas space.
    ///
    /// Order: `T(center) * R(rotation) * T(-size/2) * S(size/natural)`.
    pub fn to_affine(&self, natural_width: u32, natural_height: u32) -> Affine {
        let sx = self.width / f64::from(natural_width.max(1));
        let sy = self.height / f64::from(natural_height.max(1));
        let c = self.center();
        Affine::translate(c.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::translate(Vec2::new(-0.5 * self.width, -0.5 * self.height))
            * Affine::scale_non_uniform(sx, sy)
    }
}

/// Maps head geometry plus asset aspect ratio to draw transforms.
#[derive(Clone, Debug)]
pub struct PlacementEngine {
    cfg: PlacementConfig,
}

impl PlacementEngine {
    /// Engine using `cfg` ratios.
    pub fn new(cfg: PlacementConfig) -> Self {
        Self { cfg }
    }

    /// Active ratios.
    pub fn config(&self) -> &PlacementConfig {
        &self.cfg
    }

    /// Transforms for `slot`, given the asset's height/width ratio. Earrings yield one transform per
    /// ear; a degenerate aspect ratio yields none.
    pub fn place(&self, geometry: &HeadGeometry, slot: Slot, aspect: f64) -> Vec<PlacementTransform> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return Vec::new();
        }
        match slot {
            Slot::Earrings => self.earrings(geometry, aspect).to_vec(),
            Slot::Necklace => vec![self.necklace(geometry, aspect)],
        }
    }

    /// Left and right earring transforms. The asset top sits slightly above the ear anchor.
    pub fn earrings(&self, geometry: &HeadGeometry, aspect: f64) -> [PlacementTransform; 2] {
        let width = geometry.ear_distance * self.cfg.earring_ratio;
        let height = width * aspect;
        let lift = height * self.cfg.earring_upward_bias;
        let at = |ear: Point| PlacementTransform {
            x: ear.x - 0.5 * width,
            y: ear.y - lift,
            width,
            height,
            rotation: 0.0,
        };
        [at(geometry.left_ear), at(geometry.right_ear)]
    }

    /// Necklace transform, centered below the neck anchor and rolled with the head.
    pub fn necklace(&self, geometry: &HeadGeometry, aspect: f64) -> PlacementTransform {
        let width = geometry.ear_distance * self.cfg.necklace_ratio;
        let height = width * aspect;
        let cx = geometry.neck.x;
        let cy = geometry.neck.y + geometry.ear_distance * self.cfg.necklace_drop;
        PlacementTransform {
            x: cx - 0.5 * width,
            y: cy - 0.5 * height,
            width,
            height,
            rotation: geometry.tilt,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/engine.rs"]
mod tests;
