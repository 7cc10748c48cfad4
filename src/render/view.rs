use crate::foundation::core::{Canvas, Landmark, Point};

/// Mapping between normalized camera coordinates and canvas pixels.
///
/// This is the only place the selfie mirror is applied. Placement math, occlusion lookups and the
/// video blit all go through one `ViewTransform` built at the top of a render pass, so everything
/// downstream works in plain canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    canvas: Canvas,
    mirrored: bool,
}

impl ViewTransform {
    /// View onto `canvas`, mirrored for selfie display when `mirrored`.
    pub fn new(canvas: Canvas, mirrored: bool) -> Self {
        Self { canvas, mirrored }
    }

    /// Target canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether x is flipped.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Landmark → canvas pixel position.
    pub fn map(&self, l: Landmark) -> Point {
        let u = if self.mirrored { 1.0 - l.x } else { l.x };
        Point::new(
            u * f64::from(self.canvas.width),
            l.y * f64::from(self.canvas.height),
        )
    }

    /// Roll of the line through two mapped anchors, measured left-to-right on screen.
    ///
    /// `first` and `second` are the canvas positions of the anchors that sit left and right in the
    /// unmirrored camera image. Mirroring swaps their on-screen order, which is undone here so an
    /// upright head always reads close to zero.
    pub fn tilt(&self, first: Point, second: Point) -> f64 {
        let (a, b) = if self.mirrored {
            (second, first)
        } else {
            (first, second)
        };
        (b.y - a.y).atan2(b.x - a.x)
    }

    /// Canvas pixel column → column in a source image of `source_width` pixels.
    pub fn source_x(&self, canvas_x: u32, source_width: u32) -> u32 {
        let col = self.source_col(canvas_x);
        scale_index(col, self.canvas.width, source_width)
    }

    /// Canvas pixel row → row in a source image of `source_height` pixels.
    pub fn source_y(&self, canvas_y: u32, source_height: u32) -> u32 {
        scale_index(canvas_y, self.canvas.height, source_height)
    }

    fn source_col(&self, canvas_x: u32) -> u32 {
        if self.mirrored {
            self.canvas.width.saturating_sub(1).saturating_sub(canvas_x)
        } else {
            canvas_x
        }
    }
}

/// Nearest-sample index scaling between two resolutions of the same extent.
fn scale_index(i: u32, from: u32, to: u32) -> u32 {
    if from == 0 || to == 0 {
        return 0;
    }
    let scaled = (u64::from(i) * u64::from(to)) / u64::from(from);
    (scaled as u32).min(to - 1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
