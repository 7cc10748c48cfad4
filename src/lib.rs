//! Real-time jewelry try-on overlay.
//!
//! The crate turns camera frames plus externally detected face/hand landmarks into a composited
//! image with earrings and necklaces anchored to the head, and captures snapshots of the result.
//!
//! # Pipeline overview
//!
//! 1. **Track**: raw landmarks are smoothed and reduced to anchors, ear distance and head tilt
//!    ([`SmoothedState`]).
//! 2. **Place**: anchor geometry and the asset aspect ratio give one transform per drawn asset
//!    ([`PlacementEngine`]).
//! 3. **Render**: video, jewelry, occlusion patch, caption (snapshots only) and watermark are
//!    composited in that order on a premultiplied RGBA8 [`Surface`] ([`FrameRenderer`]).
//! 4. **Capture**: single snapshots and the deadline-driven "try all" sequence ([`TryOnSession`]).
//!
//! Detection and segmentation run outside the crate behind [`DetectionFeed`] and
//! [`SegmentationFeed`]; the session polls their replies once per frame and never blocks.
//! Mirroring for selfie view lives in one place, [`ViewTransform`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod capture;
mod config;
mod foundation;
mod occlusion;
mod placement;
mod render;
mod session;
mod tracking;

pub use assets::decode::{PreparedImage, build_fontdb, decode_image, parse_svg, rasterize_svg};
pub use assets::store::{
    AssetCatalog, AssetListing, AssetSource, DirectoryAssetSource, JewelryAsset, natural_cmp,
    normalize_rel_path,
};
pub use capture::gesture::{SwipeNavigator, wrap_index};
pub use capture::sequence::{AutoSequence, SequenceEvent};
pub use capture::sink::{DirectorySink, SnapshotSink};
pub use capture::snapshot::{
    DEFAULT_DISPLAY_NAME, DEFAULT_FILE_NAME, Snapshot, display_name_for, encode_png,
    snapshot_file_name, snapshot_names,
};
pub use config::{
    CaptureConfig, GestureConfig, OcclusionConfig, PlacementConfig, RenderConfig, SmoothingConfig,
    TryOnConfig,
};
pub use foundation::core::{Affine, Canvas, Landmark, Point, Rect, Vec2};
pub use foundation::error::{TryOnError, TryOnResult};
pub use foundation::math::{angle_delta, circular_median, wrap_angle};
pub use occlusion::compositor::{OcclusionCompositor, PixelRect, restore_person_pixels};
pub use occlusion::mask::SegmentationMask;
pub use placement::engine::{PlacementEngine, PlacementTransform, Slot};
pub use render::caption::CaptionRenderer;
pub use render::composite::{PremulRgba8, over};
pub use render::frame::{FrameInputs, FrameRenderer, FrameReport, JewelryLayer};
pub use render::surface::{Surface, VideoFrame};
pub use render::view::ViewTransform;
pub use render::watermark::Watermark;
pub use session::source::{FrameSource, StillFrameSource};
pub use session::try_on_session::{SessionOpts, SessionState, TryOnSession};
pub use tracking::feeds::{
    Detection, DetectionFeed, ImmediateFeed, InFlight, SegmentationFeed, Throttle, WorkerFeed,
};
pub use tracking::geometry::{GeometryResolver, HeadGeometry};
pub use tracking::landmarks::{LandmarkSet, face_index, hand_index};
pub use tracking::smoother::{AngleEma, AngleMedian, Ema, Filter, LandmarkSmoother};
pub use tracking::state::{SmoothedState, TrackedFace};
