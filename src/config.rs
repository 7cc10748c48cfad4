//! Tuning constants for every pipeline stage, gathered in one serializable structure.
//!
//! All sections default to the values the overlay ships with; a JSON file only needs to name the
//! fields it overrides. [`TryOnConfig::validate`] enforces the documented ranges.

use std::{path::Path, time::Duration};

use anyhow::Context;

use crate::foundation::error::{TryOnError, TryOnResult};

/// Root configuration, injected into the session and from there into each component.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TryOnConfig {
    /// Landmark and geometry filters.
    pub smoothing: SmoothingConfig,
    /// Jewelry size and offsets.
    pub placement: PlacementConfig,
    /// Person repaint over jewelry.
    pub occlusion: OcclusionConfig,
    /// Mirroring, watermark and caption.
    pub render: RenderConfig,
    /// Auto-sequence timing.
    pub capture: CaptureConfig,
    /// Swipe navigation.
    pub gesture: GestureConfig,
}

/// Exponential filter weights. Each alpha is the weight kept from the previous value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Per-landmark weight, `[0, 1)`. Default `0.7`.
    pub landmark_alpha: f64,
    /// Inter-ear distance weight, `[0, 1)`. Default `0.9`.
    pub distance_alpha: f64,
    /// Head tilt weight, `[0, 1)`. Default `0.82`.
    pub angle_alpha: f64,
    /// Length of the tilt median window, `1..=31`. Default `5`.
    pub angle_window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            landmark_alpha: 0.7,
            distance_alpha: 0.9,
            angle_alpha: 0.82,
            angle_window: 5,
        }
    }
}

/// Size and offset ratios, all relative to the inter-ear distance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Earring width over ear distance, `[0.05, 1.0]`. Default `0.25`.
    pub earring_ratio: f64,
    /// Fraction of the earring height lifted above the ear anchor, `[0, 1]`. Default `0.1`.
    pub earring_upward_bias: f64,
    /// Necklace width over ear distance, `[0.5, 3.0]`. Default `1.2`.
    pub necklace_ratio: f64,
    /// Downward offset of the necklace center below the neck anchor, `[0, 2]`. Default `0.5`.
    pub necklace_drop: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            earring_ratio: 0.25,
            earring_upward_bias: 0.1,
            necklace_ratio: 1.2,
            necklace_drop: 0.5,
        }
    }
}

/// Head box padding and segmentation cadence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcclusionConfig {
    /// Run occlusion at all.
    pub enabled: bool,
    /// Horizontal padding per side, as a fraction of the head box width, `[0, 2]`.
    pub pad_x: f64,
    /// Padding above the forehead, as a fraction of the head box height, `[0, 2]`.
    pub pad_top: f64,
    /// Padding below the chin, as a fraction of the head box height, `[0, 2]`.
    pub pad_bottom: f64,
    /// Minimum time between segmentation requests. Also bounds mask staleness. `>= 1`.
    pub segmentation_interval_ms: u64,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pad_x: 0.18,
            pad_top: 0.40,
            pad_bottom: 0.10,
            segmentation_interval_ms: 250,
        }
    }
}

impl OcclusionConfig {
    /// `segmentation_interval_ms` as a `Duration`.
    pub fn segmentation_interval(&self) -> Duration {
        Duration::from_millis(self.segmentation_interval_ms)
    }
}

/// Output composition settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Mirror the camera horizontally (selfie view).
    pub mirror: bool,
    /// Watermark width over canvas width, `(0, 1]`.
    pub watermark_width_ratio: f64,
    /// Inset of the watermark and caption from the canvas edges, `>= 0`.
    pub watermark_padding_px: f64,
    /// `[0, 1]`.
    pub watermark_opacity: f32,
    /// Caption font size, `> 0`.
    pub caption_font_size_px: f64,
    /// CSS font-family list for captions.
    pub caption_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mirror: true,
            watermark_width_ratio: 0.25,
            watermark_padding_px: 20.0,
            watermark_opacity: 0.7,
            caption_font_size_px: 24.0,
            caption_font_family: "Montserrat, sans-serif".to_string(),
        }
    }
}

/// Auto-sequence timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Delay between assigning an asset and capturing it.
    pub settle_ms: u64,
    /// Delay between a capture and the next assignment.
    pub step_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            settle_ms: 800,
            step_ms: 1500,
        }
    }
}

impl CaptureConfig {
    /// `settle_ms` as a `Duration`.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// `step_ms` as a `Duration`.
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

/// Swipe recognition thresholds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Fingertip displacement in normalized frame widths, `(0, 1)`.
    pub swipe_threshold: f64,
    /// Time after a swipe during which motion is ignored.
    pub cooldown_ms: u64,
    /// Quiet period after a swipe before a new reference sample is taken.
    pub resample_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 0.04,
            cooldown_ms: 800,
            resample_ms: 100,
        }
    }
}

impl TryOnConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> TryOnResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| TryOnError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> TryOnResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> TryOnResult<()> {
        let s = &self.smoothing;
        check_alpha("smoothing.landmark_alpha", s.landmark_alpha)?;
        check_alpha("smoothing.distance_alpha", s.distance_alpha)?;
        check_alpha("smoothing.angle_alpha", s.angle_alpha)?;
        if !(1..=31).contains(&s.angle_window) {
            return Err(TryOnError::validation(
                "smoothing.angle_window must be in 1..=31",
            ));
        }

        let p = &self.placement;
        check_range("placement.earring_ratio", p.earring_ratio, 0.05, 1.0)?;
        check_range(
            "placement.earring_upward_bias",
            p.earring_upward_bias,
            0.0,
            1.0,
        )?;
        check_range("placement.necklace_ratio", p.necklace_ratio, 0.5, 3.0)?;
        check_range("placement.necklace_drop", p.necklace_drop, 0.0, 2.0)?;

        let o = &self.occlusion;
        check_range("occlusion.pad_x", o.pad_x, 0.0, 2.0)?;
        check_range("occlusion.pad_top", o.pad_top, 0.0, 2.0)?;
        check_range("occlusion.pad_bottom", o.pad_bottom, 0.0, 2.0)?;
        if o.segmentation_interval_ms == 0 {
            return Err(TryOnError::validation(
                "occlusion.segmentation_interval_ms must be >= 1",
            ));
        }

        let r = &self.render;
        if !(r.watermark_width_ratio > 0.0 && r.watermark_width_ratio <= 1.0) {
            return Err(TryOnError::validation(
                "render.watermark_width_ratio must be in (0, 1]",
            ));
        }
        check_range(
            "render.watermark_padding_px",
            r.watermark_padding_px,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "render.watermark_opacity",
            f64::from(r.watermark_opacity),
            0.0,
            1.0,
        )?;
        if !(r.caption_font_size_px.is_finite() && r.caption_font_size_px > 0.0) {
            return Err(TryOnError::validation(
                "render.caption_font_size_px must be finite and > 0",
            ));
        }

        let g = &self.gesture;
        if !(g.swipe_threshold > 0.0 && g.swipe_threshold < 1.0) {
            return Err(TryOnError::validation(
                "gesture.swipe_threshold must be in (0, 1)",
            ));
        }

        Ok(())
    }
}

fn check_alpha(name: &str, v: f64) -> TryOnResult<()> {
    if v.is_finite() && (0.0..1.0).contains(&v) {
        Ok(())
    } else {
        Err(TryOnError::validation(format!("{name} must be in [0, 1)")))
    }
}

fn check_range(name: &str, v: f64, lo: f64, hi: f64) -> TryOnResult<()> {
    if v.is_finite() && v >= lo && v <= hi {
        Ok(())
    } else {
        Err(TryOnError::validation(format!(
            "{name} must be finite and in [{lo}, {hi}]"
        )))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
