use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::build_fontdb;
use crate::assets::store::{AssetCatalog, AssetSource};
use crate::capture::gesture::{SwipeNavigator, wrap_index};
use crate::capture::sequence::{AutoSequence, SequenceEvent};
use crate::capture::sink::SnapshotSink;
use crate::capture::snapshot::{Snapshot, snapshot_names};
use crate::config::TryOnConfig;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::occlusion::mask::SegmentationMask;
use crate::placement::engine::Slot;
use crate::render::frame::{FrameInputs, FrameRenderer, FrameReport, JewelryLayer};
use crate::render::surface::{Surface, VideoFrame};
use crate::render::watermark::Watermark;
use crate::tracking::feeds::{Detection, DetectionFeed, InFlight, SegmentationFeed, Throttle};
use crate::tracking::state::{SmoothedState, TrackedFace};

/// Where the capture controller is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Live preview, nothing pending.
    Idle,
    /// An auto-sequence is in progress.
    Running,
    /// A finished or stopped auto-sequence produced a gallery to review.
    GalleryOpen,
}

/// External collaborators injected into a session.
pub struct SessionOpts {
    /// Jewelry listings and bytes.
    pub assets: Box<dyn AssetSource + Send>,
    /// Face and hand landmarks.
    pub detection: Box<dyn DetectionFeed + Send>,
    /// Without a segmentation feed occlusion never runs.
    pub segmentation: Option<Box<dyn SegmentationFeed + Send>>,
    /// Fonts for SVG assets and captions. `None` loads system fonts.
    pub fontdb: Option<Arc<usvg::fontdb::Database>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Selection {
    category: String,
    index: usize,
}

#[derive(Debug)]
struct RunningSequence {
    category: String,
    sequence: AutoSequence,
}

/// The whole try-on pipeline for one user: tracking state, asset selection, rendering and capture.
///
/// The host drives it by calling [`TryOnSession::on_frame`] once per camera frame with a monotonic
/// timestamp. Nothing blocks: detector replies are picked up on whichever tick they arrive.
pub struct TryOnSession {
    cfg: TryOnConfig,
    catalog: AssetCatalog,
    renderer: FrameRenderer,
    tracking: SmoothedState,
    navigator: SwipeNavigator,

    detection_feed: Box<dyn DetectionFeed + Send>,
    segmentation_feed: Option<Box<dyn SegmentationFeed + Send>>,
    detection: InFlight<Detection>,
    segmentation: InFlight<TryOnResult<SegmentationMask>>,
    segmentation_gate: Throttle,
    mask: Option<SegmentationMask>,

    latest_frame: Option<VideoFrame>,
    composite: Option<Surface>,
    last_report: FrameReport,

    category: Option<String>,
    earrings: Option<Selection>,
    necklace: Option<Selection>,

    running: Option<RunningSequence>,
    state: SessionState,
    gallery: Vec<Snapshot>,
    preview: Option<Snapshot>,
}

impl std::fmt::Debug for TryOnSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryOnSession")
            .field("state", &self.state)
            .field("category", &self.category)
            .field("tracked", &self.tracking.is_tracked())
            .field("gallery", &self.gallery.len())
            .finish_non_exhaustive()
    }
}

impl TryOnSession {
    /// Validate `cfg` and build a session in [`SessionState::Idle`].
    pub fn new(cfg: TryOnConfig, opts: SessionOpts) -> TryOnResult<Self> {
        cfg.validate()?;
        let fontdb = opts.fontdb.unwrap_or_else(|| build_fontdb(&[]));
        Ok(Self {
            catalog: AssetCatalog::new(opts.assets, fontdb.clone()),
            renderer: FrameRenderer::new(&cfg, fontdb),
            tracking: SmoothedState::new(&cfg.smoothing),
            navigator: SwipeNavigator::new(cfg.gesture.clone()),
            detection_feed: opts.detection,
            segmentation_feed: opts.segmentation,
            detection: InFlight::new(),
            segmentation: InFlight::new(),
            segmentation_gate: Throttle::new(cfg.occlusion.segmentation_interval()),
            mask: None,
            latest_frame: None,
            composite: None,
            last_report: FrameReport::default(),
            category: None,
            earrings: None,
            necklace: None,
            running: None,
            state: SessionState::Idle,
            gallery: Vec::new(),
            preview: None,
            cfg,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &TryOnConfig {
        &self.cfg
    }

    /// Capture controller state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current category id.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Preloaded assets.
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Face used by the last render, if tracked.
    pub fn tracked_face(&self) -> Option<&TrackedFace> {
        self.tracking.current()
    }

    /// Latest segmentation mask.
    pub fn mask(&self) -> Option<&SegmentationMask> {
        self.mask.as_ref()
    }

    /// Selected index in `slot`, together with the category it belongs to.
    pub fn selected(&self, slot: Slot) -> Option<(&str, usize)> {
        self.slot_ref(slot)
            .as_ref()
            .map(|s| (s.category.as_str(), s.index))
    }

    fn slot_ref(&self, slot: Slot) -> &Option<Selection> {
        match slot {
            Slot::Earrings => &self.earrings,
            Slot::Necklace => &self.necklace,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Selection> {
        match slot {
            Slot::Earrings => &mut self.earrings,
            Slot::Necklace => &mut self.necklace,
        }
    }

    /// Make `category_id` current, preloading all of its assets. Returns the listing length.
    #[tracing::instrument(skip(self))]
    pub fn select_category(&mut self, category_id: &str) -> TryOnResult<usize> {
        let len = self.catalog.preload(category_id)?.len();
        self.category = Some(category_id.to_string());
        Ok(len)
    }

    /// Put a specific asset into its category's slot. The category becomes current.
    pub fn select_asset(&mut self, category_id: &str, asset_id: &str) -> TryOnResult<()> {
        self.catalog.preload(category_id)?;
        let index = self.catalog.index_of(category_id, asset_id).ok_or_else(|| {
            TryOnError::asset(format!("no asset '{asset_id}' in category '{category_id}'"))
        })?;
        self.category = Some(category_id.to_string());
        self.assign(category_id, index);
        Ok(())
    }

    /// Put asset `index` of the current category into its slot.
    pub fn select_asset_index(&mut self, index: usize) -> TryOnResult<()> {
        let category = self
            .category
            .clone()
            .ok_or_else(|| TryOnError::validation("no category selected"))?;
        let len = self.catalog.len(&category);
        if index >= len {
            return Err(TryOnError::validation(format!(
                "asset index {index} out of range for '{category}' ({len} assets)"
            )));
        }
        self.assign(&category, index);
        Ok(())
    }

    fn assign(&mut self, category: &str, index: usize) {
        *self.slot_mut(Slot::for_category(category)) = Some(Selection {
            category: category.to_string(),
            index,
        });
    }

    /// Step the current category's selection by `delta`, wrapping. Returns the new index.
    pub fn navigate(&mut self, delta: i32) -> Option<usize> {
        let category = self.category.clone()?;
        let slot = Slot::for_category(&category);
        let current = self
            .slot_ref(slot)
            .as_ref()
            .filter(|s| s.category == category)
            .map(|s| s.index);
        let next = wrap_index(current, delta, self.catalog.len(&category))?;
        self.assign(&category, next);
        Some(next)
    }

    /// Install or remove the watermark.
    pub fn set_watermark(&mut self, watermark: Option<Watermark>) {
        self.renderer.set_watermark(watermark);
    }

    /// Decode a PNG/JPEG/SVG watermark with the session's fonts and install it.
    pub fn set_watermark_bytes(&mut self, bytes: &[u8]) -> TryOnResult<()> {
        let wm = Watermark::from_bytes(bytes, self.catalog.fontdb().clone())?;
        self.renderer.set_watermark(Some(wm));
        Ok(())
    }

    /// Process one camera frame: collect detector replies, issue new requests, advance the
    /// auto-sequence and render the live composite.
    pub fn on_frame(&mut self, now: Duration, frame: VideoFrame) -> TryOnResult<FrameReport> {
        self.latest_frame = Some(frame.clone());

        let feed = &mut self.detection_feed;
        self.detection.submit(|| feed.request(&frame));
        if let Some(detection) = self.detection.poll() {
            self.handle_detection(detection, &frame, now);
        }

        self.pump_segmentation(&frame, now);
        self.advance_sequence(now)?;

        let (surface, report) = self.render_with_caption(&frame, None)?;
        self.composite = Some(surface);
        self.last_report = report;
        Ok(report)
    }

    fn handle_detection(&mut self, detection: Detection, frame: &VideoFrame, now: Duration) {
        if detection.frame_size != frame.canvas() {
            tracing::debug!(
                detected = ?detection.frame_size,
                current = ?frame.canvas(),
                "detection was made on a different frame size"
            );
        }
        let view = self.renderer.view_for(frame.canvas());
        if self.tracking.update(detection.face, &view).is_none() {
            tracing::debug!("no face tracked");
        }

        if self.running.is_some() || self.category.is_none() {
            return;
        }
        if let Some(step) = self.navigator.observe(detection.hand.as_ref(), now) {
            self.navigate(step);
        }
    }

    fn pump_segmentation(&mut self, frame: &VideoFrame, now: Duration) {
        if !self.cfg.occlusion.enabled {
            return;
        }
        let Some(feed) = self.segmentation_feed.as_mut() else {
            return;
        };
        if !self.segmentation.is_busy() && self.segmentation_gate.try_acquire(now) {
            self.segmentation.submit(|| feed.request(frame));
        }
        match self.segmentation.poll() {
            Some(Ok(mask)) => self.mask = Some(mask),
            Some(Err(e)) => tracing::warn!(error = %e, "segmentation failed; keeping previous mask"),
            None => {}
        }
    }

    fn render_with_caption(
        &mut self,
        frame: &VideoFrame,
        caption: Option<&str>,
    ) -> TryOnResult<(Surface, FrameReport)> {
        let mut layers = Vec::with_capacity(2);
        for slot in [Slot::Earrings, Slot::Necklace] {
            if let Some(sel) = self.slot_ref(slot)
                && let Some(asset) = self.catalog.get(&sel.category, sel.index)
            {
                layers.push(JewelryLayer { slot, asset });
            }
        }
        self.renderer.render(FrameInputs {
            frame,
            face: self.tracking.current(),
            jewelry: &layers,
            mask: self.mask.as_ref(),
            caption,
        })
    }

    /// Latest live composite (video, jewelry, occlusion, watermark; no caption).
    pub fn current_composite(&self) -> Option<&Surface> {
        self.composite.as_ref()
    }

    /// What the last live render drew.
    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    /// Capture the current look as a single snapshot. It becomes the preview and joins the gallery.
    #[tracing::instrument(skip(self))]
    pub fn capture_snapshot(&mut self) -> TryOnResult<Snapshot> {
        let selection = self.active_selection();
        let shot = self.take_snapshot(selection)?;
        self.preview = Some(shot.clone());
        self.gallery.push(shot.clone());
        Ok(shot)
    }

    fn take_snapshot(&mut self, selection: Option<Selection>) -> TryOnResult<Snapshot> {
        if !self.tracking.is_tracked() {
            return Err(TryOnError::capture("no face is tracked"));
        }
        let frame = self
            .latest_frame
            .clone()
            .ok_or_else(|| TryOnError::capture("no camera frame yet"))?;

        let file_name = selection.as_ref().and_then(|sel| {
            self.catalog
                .listings(&sel.category)
                .and_then(|l| l.get(sel.index))
                .map(|l| l.name.clone())
        });
        let index = selection.map(|sel| sel.index);
        let (caption, _) = snapshot_names(file_name.as_deref());

        let (surface, _) = self.render_with_caption(&frame, Some(&caption))?;
        Snapshot::encode(&surface, file_name.as_deref(), index)
    }

    /// Selection of the current category's slot, if it was made in that category.
    fn active_selection(&self) -> Option<Selection> {
        let category = self.category.as_ref()?;
        self.slot_ref(Slot::for_category(category))
            .as_ref()
            .filter(|s| &s.category == category)
            .cloned()
    }

    /// Start "try all" over the current category. A running sequence is stopped first without
    /// opening the gallery.
    #[tracing::instrument(skip(self))]
    pub fn start_auto_sequence(&mut self, now: Duration) -> TryOnResult<()> {
        let category = self
            .category
            .clone()
            .ok_or_else(|| TryOnError::capture("select a category before starting try-all"))?;
        let sequence = AutoSequence::start(self.catalog.len(&category), now, &self.cfg.capture)?;

        if self.running.take().is_some() {
            tracing::debug!("restarting auto-sequence");
        }
        self.gallery.clear();
        self.navigator.reset();
        self.running = Some(RunningSequence { category, sequence });
        self.state = SessionState::Running;
        self.advance_sequence(now)
    }

    /// Stop a running sequence. No snapshot is taken after this returns.
    pub fn stop_auto_sequence(&mut self) -> SessionState {
        if self.running.take().is_some() {
            self.state = self.after_sequence_state();
            tracing::debug!(snapshots = self.gallery.len(), state = ?self.state, "auto-sequence stopped");
        }
        self.state
    }

    fn after_sequence_state(&self) -> SessionState {
        if self.gallery.is_empty() {
            SessionState::Idle
        } else {
            SessionState::GalleryOpen
        }
    }

    fn advance_sequence(&mut self, now: Duration) -> TryOnResult<()> {
        loop {
            let Some(run) = self.running.as_mut() else {
                return Ok(());
            };
            let Some(event) = run.sequence.poll(now) else {
                return Ok(());
            };
            let category = run.category.clone();
            match event {
                SequenceEvent::Assign(i) => self.assign(&category, i),
                SequenceEvent::Capture(i) => {
                    if !self.tracking.is_tracked() {
                        tracing::debug!(index = i, "no face at capture time; skipped");
                        continue;
                    }
                    let shot = self.take_snapshot(Some(Selection { category, index: i }))?;
                    self.gallery.push(shot);
                }
                SequenceEvent::Completed => {
                    self.running = None;
                    self.state = self.after_sequence_state();
                    tracing::debug!(snapshots = self.gallery.len(), "auto-sequence completed");
                }
            }
        }
    }

    /// Whether an auto-sequence is in progress.
    pub fn is_sequence_running(&self) -> bool {
        self.running.is_some()
    }

    /// Snapshots of the current gallery, in capture order.
    pub fn gallery(&self) -> &[Snapshot] {
        &self.gallery
    }

    /// Most recent single capture.
    pub fn preview(&self) -> Option<&Snapshot> {
        self.preview.as_ref()
    }

    /// Leave [`SessionState::GalleryOpen`]. Snapshots are kept for export.
    pub fn close_gallery(&mut self) {
        if self.state == SessionState::GalleryOpen {
            self.state = SessionState::Idle;
        }
    }

    /// Hand every gallery snapshot to `sink`, in capture order.
    pub fn export_gallery(&self, sink: &mut dyn SnapshotSink) -> TryOnResult<usize> {
        if self.gallery.is_empty() {
            return Err(TryOnError::capture("no snapshots to export"));
        }
        for shot in &self.gallery {
            sink.accept(shot)?;
        }
        Ok(self.gallery.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/try_on_session.rs"]
mod tests;
