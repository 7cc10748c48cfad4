use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TryOnError, TryOnResult};

/// Binary person/background mask produced against the unmirrored camera frame.
///
/// Usually lower resolution than the canvas; lookups scale coordinates independently per axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentationMask {
    width: u32,
    height: u32,
    /// One byte per pixel, non-zero marks "person".
    data: Vec<u8>,
}

impl SegmentationMask {
    /// Mask from one byte per pixel, non-zero meaning person.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> TryOnResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.pixel_count() {
            return Err(TryOnError::validation(format!(
                "mask is {} bytes, expected {} for {width}x{height}",
                data.len(),
                canvas.pixel_count()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Threshold per-pixel person confidences into a binary mask.
    pub fn from_confidence(
        width: u32,
        height: u32,
        confidence: &[f32],
        threshold: f32,
    ) -> TryOnResult<Self> {
        let data = confidence
            .iter()
            .map(|&c| u8::from(c >= threshold))
            .collect();
        Self::new(width, height, data)
    }

    /// Decode an encoded grayscale (or color) image; luma of 128 or more marks "person".
    pub fn from_image_bytes(bytes: &[u8]) -> TryOnResult<Self> {
        let luma = image::load_from_memory(bytes)
            .context("decode segmentation mask")?
            .to_luma8();
        let (width, height) = luma.dimensions();
        let data = luma.into_raw().into_iter().map(|v| u8::from(v >= 128)).collect();
        Self::new(width, height, data)
    }

    /// Mask width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is classified as person. Out of range reads as background.
    pub fn is_person(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)] != 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/occlusion/mask.rs"]
mod tests;
