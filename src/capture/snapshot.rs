use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TryOnError, TryOnResult};
use crate::render::surface::Surface;

/// Caption used when no asset is selected.
pub const DEFAULT_DISPLAY_NAME: &str = "Aurum Look";
/// File name used when no asset is selected.
pub const DEFAULT_FILE_NAME: &str = "aurum_look.png";

/// A captured, fully composited frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// PNG-encoded image.
    pub png: Arc<Vec<u8>>,
    /// Caption text.
    pub display_name: String,
    /// Suggested file name, `.png` included.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Catalog index of the asset shown, when one was selected.
    pub asset_index: Option<usize>,
}

impl Snapshot {
    /// Encode `surface` as PNG and name it after `asset_file_name` (or the defaults).
    pub fn encode(
        surface: &Surface,
        asset_file_name: Option<&str>,
        asset_index: Option<usize>,
    ) -> TryOnResult<Self> {
        let png = encode_png(surface)?;
        let (display_name, file_name) = snapshot_names(asset_file_name);
        Ok(Self {
            png: Arc::new(png),
            display_name,
            file_name,
            width: surface.width(),
            height: surface.height(),
            asset_index,
        })
    }
}

/// Display and file name for a snapshot of `asset_file_name`, falling back to the defaults.
pub fn snapshot_names(asset_file_name: Option<&str>) -> (String, String) {
    match asset_file_name {
        Some(name) if !file_stem(name).is_empty() => {
            (display_name_for(name), snapshot_file_name(name))
        }
        _ => (
            DEFAULT_DISPLAY_NAME.to_string(),
            DEFAULT_FILE_NAME.to_string(),
        ),
    }
}

/// Encode a surface as straight-alpha RGBA8 PNG.
pub fn encode_png(surface: &Surface) -> TryOnResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), surface.to_straight_rgba8())
        .ok_or_else(|| TryOnError::evaluation("surface buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode snapshot png")?;
    Ok(buf)
}

/// File name without its last extension.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

/// Human-readable asset name: stem, `_`/`-` as spaces, every word capitalized.
pub fn display_name_for(file_name: &str) -> String {
    let mut out = String::with_capacity(file_name.len());
    let mut prev_word = false;
    for c in file_stem(file_name).chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        let word = c.is_alphanumeric();
        if word && !prev_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_word = word;
    }
    out
}

/// Snapshot file name: the asset's stem with a `.png` extension.
pub fn snapshot_file_name(file_name: &str) -> String {
    format!("{}.png", file_stem(file_name))
}

#[cfg(test)]
#[path = "../../tests/unit/capture/snapshot.rs"]
mod tests;
