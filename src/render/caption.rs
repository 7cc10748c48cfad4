use std::sync::Arc;

use crate::assets::decode::{parse_svg, rasterize_svg};
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::TryOnResult;
use crate::render::surface::Surface;

/// Shadow offset in pixels, down and to the right of the text.
const SHADOW_OFFSET_PX: f64 = 2.0;
const SHADOW_OPACITY: f64 = 0.8;
/// Fraction of the font size between the alphabetic baseline and the bottom of the glyph box.
const DESCENT_RATIO: f64 = 0.2;

/// Bottom-left caption with a drop shadow, laid out as SVG text and rasterized through `resvg`.
#[derive(Clone)]
pub struct CaptionRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
    font_family: String,
    font_size_px: f64,
    padding_px: f64,
}

impl std::fmt::Debug for CaptionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionRenderer")
            .field("font_family", &self.font_family)
            .field("font_size_px", &self.font_size_px)
            .field("padding_px", &self.padding_px)
            .finish_non_exhaustive()
    }
}

impl CaptionRenderer {
    /// Renderer drawing `font_size_px` text inset by `padding_px`.
    pub fn new(
        fontdb: Arc<usvg::fontdb::Database>,
        font_family: impl Into<String>,
        font_size_px: f64,
        padding_px: f64,
    ) -> Self {
        Self {
            fontdb,
            font_family: font_family.into(),
            font_size_px,
            padding_px,
        }
    }

    /// Height of the strip the caption occupies at the bottom of the canvas.
    pub fn strip_height(&self) -> u32 {
        (self.font_size_px * 2.0 + self.padding_px).ceil().max(1.0) as u32
    }

    /// SVG document for a caption strip `width` pixels wide.
    pub fn svg_document(&self, text: &str, width: u32) -> String {
        let height = self.strip_height();
        let baseline = f64::from(height) - self.padding_px - self.font_size_px * DESCENT_RATIO;
        let family = escape_xml(&self.font_family);
        let text = escape_xml(text);
        let size = self.font_size_px;
        let x = self.padding_px;
        let sx = x + SHADOW_OFFSET_PX;
        let sy = baseline + SHADOW_OFFSET_PX;
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
<text x="{sx}" y="{sy}" font-family="{family}" font-weight="bold" font-size="{size}" fill="#000000" fill-opacity="{SHADOW_OPACITY}">{text}</text>
<text x="{x}" y="{baseline}" font-family="{family}" font-weight="bold" font-size="{size}" fill="#ffffff">{text}</text>
</svg>"##
        )
    }

    /// Draw `text` along the bottom-left of `surface`. Returns the number of covered pixels.
    pub fn draw(&self, surface: &mut Surface, text: &str) -> TryOnResult<usize> {
        if text.trim().is_empty() {
            return Ok(0);
        }
        let width = surface.width();
        let height = self.strip_height();
        let svg = self.svg_document(text, width);
        let tree = parse_svg(svg.as_bytes(), self.fontdb.clone())?;
        let strip = rasterize_svg(&tree, Canvas { width, height })?;

        let top = f64::from(surface.height()) - f64::from(height);
        Ok(surface.draw_image(&strip, Affine::translate((0.0, top)), 1.0))
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
