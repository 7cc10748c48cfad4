use std::sync::Arc;

use crate::assets::store::JewelryAsset;
use crate::config::TryOnConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::TryOnResult;
use crate::occlusion::compositor::OcclusionCompositor;
use crate::occlusion::mask::SegmentationMask;
use crate::placement::engine::{PlacementEngine, Slot};
use crate::render::caption::CaptionRenderer;
use crate::render::surface::{Surface, VideoFrame};
use crate::render::view::ViewTransform;
use crate::render::watermark::Watermark;
use crate::tracking::state::TrackedFace;

/// One asset to draw in one slot.
#[derive(Clone, Copy, Debug)]
pub struct JewelryLayer<'a> {
    /// Where to draw.
    pub slot: Slot,
    /// What to draw.
    pub asset: &'a JewelryAsset,
}

/// Everything a single render pass reads.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Camera frame; also fixes the output size.
    pub frame: &'a VideoFrame,
    /// Tracked face, `None` when no face is visible.
    pub face: Option<&'a TrackedFace>,
    /// Assets to place, drawn in order.
    pub jewelry: &'a [JewelryLayer<'a>],
    /// Latest person mask, if any.
    pub mask: Option<&'a SegmentationMask>,
    /// Snapshot caption; `None` for live frames.
    pub caption: Option<&'a str>,
}

/// What a render pass actually drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Placed jewelry images.
    pub jewelry_draws: usize,
    /// Pixels repainted from the camera by occlusion.
    pub occluded_pixels: usize,
    /// Whether a caption was drawn.
    pub caption_drawn: bool,
    /// Whether the watermark was drawn.
    pub watermark_drawn: bool,
}

/// Composites one frame in a fixed order: video, jewelry, occlusion, caption, watermark.
#[derive(Debug)]
pub struct FrameRenderer {
    cfg: TryOnConfig,
    placement: PlacementEngine,
    occlusion: OcclusionCompositor,
    caption: CaptionRenderer,
    watermark: Option<Watermark>,
}

impl FrameRenderer {
    /// Renderer for `cfg`, using `fontdb` for captions.
    pub fn new(cfg: &TryOnConfig, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        let r = &cfg.render;
        Self {
            cfg: cfg.clone(),
            placement: PlacementEngine::new(cfg.placement.clone()),
            occlusion: OcclusionCompositor::new(cfg.occlusion.clone()),
            caption: CaptionRenderer::new(
                fontdb,
                r.caption_font_family.clone(),
                r.caption_font_size_px,
                r.watermark_padding_px,
            ),
            watermark: None,
        }
    }

    /// The view every stage of a pass must share: canvas = camera frame size.
    pub fn view_for(&self, canvas: Canvas) -> ViewTransform {
        ViewTransform::new(canvas, self.cfg.render.mirror)
    }

    /// Install or remove the watermark.
    pub fn set_watermark(&mut self, watermark: Option<Watermark>) {
        self.watermark = watermark;
    }

    /// Whether a watermark is installed.
    pub fn has_watermark(&self) -> bool {
        self.watermark.is_some()
    }

    /// Composite one frame. Missing face or mask degrade to fewer layers, never to an error.
    pub fn render(&mut self, inputs: FrameInputs<'_>) -> TryOnResult<(Surface, FrameReport)> {
        let canvas = inputs.frame.canvas();
        let view = self.view_for(canvas);
        let mut report = FrameReport::default();

        let mut base = Surface::new(canvas);
        base.draw_video(inputs.frame, &view);
        let mut out = base.clone();

        if let Some(face) = inputs.face {
            for layer in inputs.jewelry {
                let asset = layer.asset;
                let Some(aspect) = asset.aspect_ratio() else {
                    tracing::debug!(asset = %asset.id, "asset has a zero dimension; skipped");
                    continue;
                };
                for t in self.placement.place(&face.geometry, layer.slot, aspect) {
                    let xf = t.to_affine(asset.natural_width, asset.natural_height);
                    out.draw_image(&asset.image, xf, 1.0);
                    report.jewelry_draws += 1;
                }
            }
            report.occluded_pixels =
                self.occlusion
                    .apply(&mut out, &base, inputs.mask, &face.landmarks, &view);
        }

        if let Some(text) = inputs.caption {
            match self.caption.draw(&mut out, text) {
                Ok(n) => report.caption_drawn = n > 0,
                Err(e) => tracing::warn!(error = %e, "caption skipped"),
            }
        }

        if let Some(wm) = self.watermark.as_mut() {
            report.watermark_drawn = wm.draw(&mut out, &self.cfg.render);
        }

        Ok((out, report))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
