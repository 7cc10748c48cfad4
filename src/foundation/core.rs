use crate::foundation::error::{TryOnError, TryOnResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a drawing surface or camera frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Non-empty canvas; zero in either dimension is a `Validation` error.
    pub fn new(width: u32, height: u32) -> TryOnResult<Self> {
        if width == 0 || height == 0 {
            return Err(TryOnError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// `width * height`.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Buffer length of an RGBA8 image of this size.
    pub fn byte_len_rgba8(self) -> usize {
        self.pixel_count() * 4
    }

    /// `(0, 0)` to `(width, height)`.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// A tracked keypoint in normalized image coordinates (`x`, `y` in `[0, 1]`, `z` relative depth).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Landmark {
    /// Horizontal position, `0` = left edge of the camera image.
    pub x: f64,
    /// Vertical position, `0` = top edge.
    pub y: f64,
    /// Relative depth; missing in JSON means `0`.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    /// Landmark from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Per-coordinate convex blend `prev * alpha + next * (1 - alpha)`.
    ///
    /// Evaluated as `next + (prev - next) * alpha` so equal inputs come back bit-identical.
    pub fn blend(prev: Self, next: Self, alpha: f64) -> Self {
        Self {
            x: lerp_toward(prev.x, next.x, alpha),
            y: lerp_toward(prev.y, next.y, alpha),
            z: lerp_toward(prev.z, next.z, alpha),
        }
    }
}

/// `prev * alpha + next * (1 - alpha)`, exact when `prev == next`.
pub(crate) fn lerp_toward(prev: f64, next: f64, alpha: f64) -> f64 {
    next + (prev - next) * alpha
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
