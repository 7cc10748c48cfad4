use crate::config::OcclusionConfig;
use crate::foundation::core::Rect;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::occlusion::mask::SegmentationMask;
use crate::render::surface::Surface;
use crate::render::view::ViewTransform;
use crate::tracking::landmarks::{LandmarkSet, face_index};

/// Integer pixel rectangle, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left column.
    pub x0: u32,
    /// Top row.
    pub y0: u32,
    /// Right column, exclusive.
    pub x1: u32,
    /// Bottom row, exclusive.
    pub y1: u32,
}

impl PixelRect {
    /// Whether the rectangle covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Whether pixel `(x, y)` is inside.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Covered pixel count.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        u64::from(self.x1 - self.x0) * u64::from(self.y1 - self.y0)
    }
}

/// Restores real head/hair pixels over the jewelry layer so assets read as sitting behind the
/// person where the segmentation says so.
#[derive(Clone, Debug)]
pub struct OcclusionCompositor {
    cfg: OcclusionConfig,
}

impl OcclusionCompositor {
    /// Compositor using `cfg` padding.
    pub fn new(cfg: OcclusionConfig) -> Self {
        Self { cfg }
    }

    /// Active settings.
    pub fn config(&self) -> &OcclusionConfig {
        &self.cfg
    }

    /// Padded head bounding box in canvas pixels, clipped to the canvas.
    ///
    /// Built from the forehead, chin and cheek outline points; padding is asymmetric so hair above
    /// the forehead is included.
    pub fn head_region(&self, landmarks: &LandmarkSet, view: &ViewTransform) -> Option<PixelRect> {
        let mut bounds: Option<Rect> = None;
        for idx in face_index::HEAD_OUTLINE {
            let p = view.map(landmarks.get(idx)?);
            let point_rect = Rect::from_points(p, p);
            bounds = Some(match bounds {
                Some(r) => r.union(point_rect),
                None => point_rect,
            });
        }
        let r = bounds?;

        let pad_x = r.width() * self.cfg.pad_x;
        let padded = Rect::new(
            r.x0 - pad_x,
            r.y0 - r.height() * self.cfg.pad_top,
            r.x1 + pad_x,
            r.y1 + r.height() * self.cfg.pad_bottom,
        )
        .intersect(view.canvas().bounds());

        let rect = PixelRect {
            x0: padded.x0.floor().max(0.0) as u32,
            y0: padded.y0.floor().max(0.0) as u32,
            x1: (padded.x1.ceil().max(0.0) as u32).min(view.canvas().width),
            y1: (padded.y1.ceil().max(0.0) as u32).min(view.canvas().height),
        };
        if rect.is_empty() { None } else { Some(rect) }
    }

    /// Run occlusion for one frame. Every failure degrades to "no occlusion" and returns `0`.
    ///
    /// `base` is the unmodified video layer at canvas resolution; `composite` already carries the
    /// jewelry. Returns the number of restored pixels.
    pub fn apply(
        &self,
        composite: &mut Surface,
        base: &Surface,
        mask: Option<&SegmentationMask>,
        landmarks: &LandmarkSet,
        view: &ViewTransform,
    ) -> usize {
        if !self.cfg.enabled {
            return 0;
        }
        let Some(mask) = mask else {
            tracing::debug!("no segmentation mask yet; skipping occlusion");
            return 0;
        };
        let Some(region) = self.head_region(landmarks, view) else {
            tracing::debug!("empty head region; skipping occlusion");
            return 0;
        };
        match restore_person_pixels(composite, base, mask, region, view) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "occlusion failed; frame keeps jewelry on top");
                0
            }
        }
    }
}

/// Copy `base` pixels into `composite` wherever `region` overlaps a "person" mask pixel.
///
/// Pixels outside `region` are never written.
pub fn restore_person_pixels(
    composite: &mut Surface,
    base: &Surface,
    mask: &SegmentationMask,
    region: PixelRect,
    view: &ViewTransform,
) -> TryOnResult<usize> {
    if composite.canvas() != base.canvas() || composite.canvas() != view.canvas() {
        return Err(TryOnError::evaluation(
            "occlusion surfaces must share the view canvas",
        ));
    }
    let canvas = composite.canvas();
    if region.is_empty() || region.x1 > canvas.width || region.y1 > canvas.height {
        return Err(TryOnError::evaluation(format!(
            "occlusion region {region:?} does not fit {}x{}",
            canvas.width, canvas.height
        )));
    }

    let mut restored = 0usize;
    for y in region.y0..region.y1 {
        let my = view.source_y(y, mask.height());
        for x in region.x0..region.x1 {
            let mx = view.source_x(x, mask.width());
            if mask.is_person(mx, my) {
                composite.set_pixel(x, y, base.pixel(x, y));
                restored += 1;
            }
        }
    }
    Ok(restored)
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/compositor.rs"]
mod tests;
