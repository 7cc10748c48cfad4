use std::path::PathBuf;

use crate::foundation::error::{TryOnError, TryOnResult};
use crate::render::surface::VideoFrame;

/// A camera or any other producer of frames.
///
/// `open` failing is terminal: the caller reports the `Device` error and does not retry.
pub trait FrameSource {
    /// Acquire the device. Failure is a `Device` error.
    fn open(&mut self) -> TryOnResult<()>;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> TryOnResult<Option<VideoFrame>>;
}

/// Repeats one still image forever. Stands in for a camera in offline runs.
#[derive(Debug)]
pub struct StillFrameSource {
    path: PathBuf,
    frame: Option<VideoFrame>,
}

impl StillFrameSource {
    /// Source that decodes `path` on [`FrameSource::open`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }

    /// Source over an in-memory frame; `open` always succeeds.
    pub fn from_frame(frame: VideoFrame) -> Self {
        Self {
            path: PathBuf::new(),
            frame: Some(frame),
        }
    }
}

impl FrameSource for StillFrameSource {
    fn open(&mut self) -> TryOnResult<()> {
        if self.frame.is_some() {
            return Ok(());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| {
            TryOnError::device(format!("open frame source '{}': {e}", self.path.display()))
        })?;
        let frame = VideoFrame::from_image_bytes(&bytes).map_err(|e| {
            TryOnError::device(format!("decode frame source '{}': {e}", self.path.display()))
        })?;
        self.frame = Some(frame);
        Ok(())
    }

    fn next_frame(&mut self) -> TryOnResult<Option<VideoFrame>> {
        match &self.frame {
            Some(frame) => Ok(Some(frame.clone())),
            None => Err(TryOnError::device("frame source is not open")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/source.rs"]
mod tests;
