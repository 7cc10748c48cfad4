use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::render::composite::premultiply_rgba8_in_place;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TryOnResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(TryOnError::validation(format!(
                "image buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Height over width, or `None` for a degenerate image.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(f64::from(self.height) / f64::from(self.width))
    }

    /// Premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TryOnResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree using the given font database.
pub fn parse_svg(bytes: &[u8], fontdb: Arc<usvg::fontdb::Database>) -> TryOnResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize a parsed SVG, stretched to `size`, into premultiplied RGBA8.
pub fn rasterize_svg(tree: &usvg::Tree, size: Canvas) -> TryOnResult<PreparedImage> {
    const MAX_DIM: u32 = 16_384;
    if size.width > MAX_DIM || size.height > MAX_DIM {
        return Err(TryOnError::evaluation(format!(
            "svg raster size too large: {}x{} (max {MAX_DIM}x{MAX_DIM})",
            size.width, size.height
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
        .ok_or_else(|| TryOnError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (size.width as f32) / tree.size().width();
    let sy = (size.height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    PreparedImage::from_premul(size.width, size.height, pixmap.data().to_vec())
}

/// Whether `bytes` look like an SVG document rather than a raster image.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

/// Font database with system fonts plus any `.ttf`/`.otf`/`.ttc` files found in `extra_dirs`.
pub fn build_fontdb(extra_dirs: &[&std::path::Path]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in extra_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &std::path::Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
