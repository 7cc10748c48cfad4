//! The asynchronous boundary to the external detectors.
//!
//! Feeds answer through a `std::sync::mpsc::Receiver` that the session polls once per tick. The
//! session keeps at most one request outstanding per feed ([`InFlight`]) and gates segmentation
//! with a [`Throttle`].

use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::time::Duration;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::TryOnResult;
use crate::occlusion::mask::SegmentationMask;
use crate::render::surface::VideoFrame;
use crate::tracking::landmarks::LandmarkSet;

/// Result of running face and hand detection on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Face mesh landmarks, if a face was found.
    pub face: Option<LandmarkSet>,
    /// Hand landmarks, if a hand was found.
    pub hand: Option<LandmarkSet>,
    /// Size of the frame the detection ran on.
    pub frame_size: Canvas,
}

impl Detection {
    /// Nothing detected.
    pub fn empty(frame_size: Canvas) -> Self {
        Self {
            face: None,
            hand: None,
            frame_size,
        }
    }
}

/// Face and hand detector.
pub trait DetectionFeed {
    /// Start detection on `frame`; the reply arrives on the receiver.
    fn request(&mut self, frame: &VideoFrame) -> Receiver<Detection>;
}

/// Person segmentation model.
pub trait SegmentationFeed {
    /// Start segmentation of `frame`; the reply arrives on the receiver.
    fn request(&mut self, frame: &VideoFrame) -> Receiver<TryOnResult<SegmentationMask>>;
}

/// Feed that answers synchronously from a closure. The reply is already queued when `request`
/// returns.
pub struct ImmediateFeed<F> {
    respond: F,
}

impl<F> ImmediateFeed<F> {
    /// Feed answering with `respond`.
    pub fn new(respond: F) -> Self {
        Self { respond }
    }
}

impl<F> DetectionFeed for ImmediateFeed<F>
where
    F: FnMut(&VideoFrame) -> Detection,
{
    fn request(&mut self, frame: &VideoFrame) -> Receiver<Detection> {
        answer_now((self.respond)(frame))
    }
}

impl<F> SegmentationFeed for ImmediateFeed<F>
where
    F: FnMut(&VideoFrame) -> TryOnResult<SegmentationMask>,
{
    fn request(&mut self, frame: &VideoFrame) -> Receiver<TryOnResult<SegmentationMask>> {
        answer_now((self.respond)(frame))
    }
}

fn answer_now<T>(value: T) -> Receiver<T> {
    let (tx, rx) = mpsc::channel();
    let _ = tx.send(value);
    rx
}

type Job<T> = (VideoFrame, Sender<T>);

/// Feed backed by a dedicated worker thread running a (possibly slow) model.
///
/// The job queue holds a single frame. A request made while the queue is full gets a receiver
/// whose sender is already gone; [`InFlight::poll`] reports that as a dropped request.
pub struct WorkerFeed<T> {
    jobs: SyncSender<Job<T>>,
}

impl<T: Send + 'static> WorkerFeed<T> {
    /// Spawn a worker named `name` that answers every request with `run`.
    pub fn spawn<F>(name: &str, mut run: F) -> TryOnResult<Self>
    where
        F: FnMut(&VideoFrame) -> T + Send + 'static,
    {
        let (jobs, queue) = mpsc::sync_channel::<Job<T>>(1);
        std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok((frame, reply)) = queue.recv() {
                    let _ = reply.send(run(&frame));
                }
            })
            .with_context(|| format!("spawn feed worker '{name}'"))?;
        Ok(Self { jobs })
    }

    fn submit(&self, frame: &VideoFrame) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        if let Err(e) = self.jobs.try_send((frame.clone(), tx)) {
            tracing::debug!(error = %e, "feed worker unavailable; request dropped");
        }
        rx
    }
}

impl DetectionFeed for WorkerFeed<Detection> {
    fn request(&mut self, frame: &VideoFrame) -> Receiver<Detection> {
        self.submit(frame)
    }
}

impl SegmentationFeed for WorkerFeed<TryOnResult<SegmentationMask>> {
    fn request(&mut self, frame: &VideoFrame) -> Receiver<TryOnResult<SegmentationMask>> {
        self.submit(frame)
    }
}

/// Drop-if-busy guard holding the one outstanding request of a feed.
#[derive(Debug)]
pub struct InFlight<T> {
    pending: Option<Receiver<T>>,
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> InFlight<T> {
    /// Guard with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue a request unless one is outstanding. Returns whether `request` was called.
    pub fn submit(&mut self, request: impl FnOnce() -> Receiver<T>) -> bool {
        if self.pending.is_some() {
            tracing::debug!("feed busy; frame skipped");
            return false;
        }
        self.pending = Some(request());
        true
    }

    /// Non-blocking check for the outstanding reply.
    pub fn poll(&mut self) -> Option<T> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(v) => {
                self.pending = None;
                Some(v)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("feed dropped a request without replying");
                self.pending = None;
                None
            }
        }
    }

    /// Forget the outstanding request; a late reply is discarded.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Minimum-interval gate.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    /// Gate that opens once every `interval`; open at first use.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether the gate would open at `now`.
    pub fn is_ready(&self, now: Duration) -> bool {
        self.last
            .is_none_or(|last| now.saturating_sub(last) >= self.interval)
    }

    /// Consume the gate if open.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/feeds.rs"]
mod tests;
