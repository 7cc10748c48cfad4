use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image, looks_like_svg, parse_svg, rasterize_svg};
use crate::config::RenderConfig;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::TryOnResult;
use crate::render::surface::Surface;

enum Source {
    Raster(PreparedImage),
    Svg {
        tree: Arc<usvg::Tree>,
        /// Last rasterization, keyed by its pixel size.
        cached: Option<PreparedImage>,
    },
}

/// Brand mark drawn in the bottom-right corner after every other layer.
pub struct Watermark {
    source: Source,
}

impl std::fmt::Debug for Watermark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.source {
            Source::Raster(_) => "raster",
            Source::Svg { .. } => "svg",
        };
        f.debug_struct("Watermark").field("kind", &kind).finish()
    }
}

impl Watermark {
    /// Watermark from decoded pixels.
    pub fn from_image(image: PreparedImage) -> Self {
        Self {
            source: Source::Raster(image),
        }
    }

    /// Decode a raster image or an SVG document.
    pub fn from_bytes(bytes: &[u8], fontdb: Arc<usvg::fontdb::Database>) -> TryOnResult<Self> {
        if looks_like_svg(bytes) {
            let tree = parse_svg(bytes, fontdb)?;
            return Ok(Self {
                source: Source::Svg {
                    tree: Arc::new(tree),
                    cached: None,
                },
            });
        }
        Ok(Self::from_image(decode_image(bytes)?))
    }

    /// Target rectangle on a canvas: `watermark_width_ratio` of the canvas width, aspect preserved,
    /// inset from the bottom-right corner by the configured padding.
    pub fn target_rect(&self, canvas: Canvas, cfg: &RenderConfig) -> Option<Rect> {
        let aspect = match &self.source {
            Source::Raster(img) => img.aspect_ratio()?,
            Source::Svg { tree, .. } => {
                let size = tree.size();
                if size.width() <= 0.0 {
                    return None;
                }
                f64::from(size.height() / size.width())
            }
        };
        let w = f64::from(canvas.width) * cfg.watermark_width_ratio;
        let h = w * aspect;
        let x1 = f64::from(canvas.width) - cfg.watermark_padding_px;
        let y1 = f64::from(canvas.height) - cfg.watermark_padding_px;
        Some(Rect::new(x1 - w, y1 - h, x1, y1))
    }

    /// Draw onto `surface`. Returns whether anything was drawn.
    pub fn draw(&mut self, surface: &mut Surface, cfg: &RenderConfig) -> bool {
        let Some(rect) = self.target_rect(surface.canvas(), cfg) else {
            return false;
        };
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return false;
        }

        let image = match &mut self.source {
            Source::Raster(img) => img.clone(),
            Source::Svg { tree, cached } => {
                let size = Canvas {
                    width: rect.width().round() as u32,
                    height: rect.height().round() as u32,
                };
                let reuse = cached
                    .as_ref()
                    .is_some_and(|c| c.width == size.width && c.height == size.height);
                if !reuse {
                    match rasterize_svg(tree, size) {
                        Ok(img) => *cached = Some(img),
                        Err(e) => {
                            tracing::warn!(error = %e, "watermark rasterization failed");
                            return false;
                        }
                    }
                }
                let Some(img) = cached.clone() else {
                    return false;
                };
                img
            }
        };

        let xf = Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / f64::from(image.width),
                rect.height() / f64::from(image.height),
            );
        surface.draw_image(&image, xf, cfg.watermark_opacity) > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/watermark.rs"]
mod tests;
