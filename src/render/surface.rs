use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::render::composite::{PremulRgba8, over, unpremultiply_rgba8_in_place};
use crate::render::view::ViewTransform;

/// One camera frame in straight RGBA8, as delivered by the frame source.
///
/// Pixels are shared so the same frame can be handed to detection, segmentation and the renderer
/// without copying.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl VideoFrame {
    /// Wrap straight RGBA8 pixels. The buffer must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> TryOnResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if rgba8.len() != canvas.byte_len_rgba8() {
            return Err(TryOnError::validation(format!(
                "video frame is {} bytes, expected {} for {width}x{height}",
                rgba8.len(),
                canvas.byte_len_rgba8()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// A frame filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> TryOnResult<Self> {
        let canvas = Canvas::new(width, height)?;
        Self::new(width, height, rgba.repeat(canvas.pixel_count()))
    }

    /// Decode an encoded still (PNG, JPEG, ...) into a frame.
    pub fn from_image_bytes(bytes: &[u8]) -> TryOnResult<Self> {
        let rgba = image::load_from_memory(bytes)
            .context("decode video frame image")?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    /// Frame dimensions as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight RGBA8 pixels, row-major.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }
}

/// A premultiplied RGBA8 drawing surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0; canvas.byte_len_rgba8()],
        }
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel with `rgba`.
    pub fn clear(&mut self, rgba: PremulRgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let idx = self.index(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Overwrite pixel `(x, y)`. Panics when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: PremulRgba8) {
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4
    }

    /// Fill the whole surface from a camera frame, scaling by nearest sample and mirroring through
    /// `view`. Camera pixels are treated as opaque.
    pub fn draw_video(&mut self, frame: &VideoFrame, view: &ViewTransform) {
        for y in 0..self.canvas.height {
            let sy = view.source_y(y, frame.height);
            for x in 0..self.canvas.width {
                let sx = view.source_x(x, frame.width);
                let [r, g, b, _] = frame.pixel(sx, sy);
                self.set_pixel(x, y, [r, g, b, 255]);
            }
        }
    }

    /// Draw `image` through `transform` (image pixel space → canvas space) with bilinear sampling.
    ///
    /// Returns the number of canvas pixels that received any coverage. A singular transform or an
    /// image that lands fully off-canvas draws nothing.
    pub fn draw_image(&mut self, image: &PreparedImage, transform: Affine, opacity: f32) -> usize {
        if image.width == 0 || image.height == 0 || opacity <= 0.0 {
            return 0;
        }
        if transform.determinant().abs() < 1e-12 {
            return 0;
        }

        let local = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let bbox = transform
            .transform_rect_bbox(local)
            .intersect(self.canvas.bounds());
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return 0;
        }

        let inv = transform.inverse();
        let x0 = bbox.x0.floor().max(0.0) as u32;
        let y0 = bbox.y0.floor().max(0.0) as u32;
        let x1 = (bbox.x1.ceil() as u32).min(self.canvas.width);
        let y1 = (bbox.y1.ceil() as u32).min(self.canvas.height);

        let mut touched = 0usize;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let Some(src) = sample_bilinear(image, p.x, p.y) else {
                    continue;
                };
                let dst = self.pixel(x, y);
                self.set_pixel(x, y, over(dst, src, opacity));
                touched += 1;
            }
        }
        touched
    }

    /// Straight (non-premultiplied) RGBA8 copy of the pixels, ready for encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Bilinear sample at a point in image pixel space (pixel centers at `n + 0.5`).
///
/// Points outside the image footprint return `None`; inside it, neighbors are clamped to the edge
/// so borders stay crisp.
fn sample_bilinear(image: &PreparedImage, px: f64, py: f64) -> Option<PremulRgba8> {
    let w = f64::from(image.width);
    let h = f64::from(image.height);
    if !(px >= 0.0 && py >= 0.0 && px < w && py < h) {
        return None;
    }

    let u = px - 0.5;
    let v = py - 0.5;
    let fx = u.floor();
    let fy = v.floor();
    let tx = u - fx;
    let ty = v - fy;

    let max_x = i64::from(image.width) - 1;
    let max_y = i64::from(image.height) - 1;
    let x0 = (fx as i64).clamp(0, max_x) as u32;
    let x1 = (fx as i64 + 1).clamp(0, max_x) as u32;
    let y0 = (fy as i64).clamp(0, max_y) as u32;
    let y1 = (fy as i64 + 1).clamp(0, max_y) as u32;

    let c00 = image.pixel(x0, y0);
    let c10 = image.pixel(x1, y0);
    let c01 = image.pixel(x0, y1);
    let c11 = image.pixel(x1, y1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(c00[i]) * (1.0 - tx) + f64::from(c10[i]) * tx;
        let bottom = f64::from(c01[i]) * (1.0 - tx) + f64::from(c11[i]) * tx;
        out[i] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    if out[3] == 0 { None } else { Some(out) }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
