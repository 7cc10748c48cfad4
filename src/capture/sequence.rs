use std::time::Duration;

use crate::config::CaptureConfig;
use crate::foundation::error::{TryOnError, TryOnResult};

/// What the session must do when a sequence deadline passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceEvent {
    /// Show asset `i` in the category's slot.
    Assign(usize),
    /// Capture a snapshot of asset `i`.
    Capture(usize),
    /// Every asset was visited.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Assign { index: usize, at: Duration },
    Capture { index: usize, at: Duration },
    Finished,
}

/// Deadline-driven "try all" run over `len` assets.
///
/// Each transition schedules the next deadline from the previous one, so the timeline does not
/// drift with frame timing: asset `i` is assigned at `start + i * (settle + step)` and captured
/// `settle` later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoSequence {
    len: usize,
    settle: Duration,
    step: Duration,
    phase: Phase,
}

impl AutoSequence {
    /// Start a run at `now`. Fails with a `Capture` error for an empty category.
    pub fn start(len: usize, now: Duration, cfg: &CaptureConfig) -> TryOnResult<Self> {
        if len == 0 {
            return Err(TryOnError::capture("auto-sequence needs at least one asset"));
        }
        Ok(Self {
            len,
            settle: cfg.settle(),
            step: cfg.step(),
            phase: Phase::Assign { index: 0, at: now },
        })
    }

    /// Number of assets in the run.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a started run.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether [`SequenceEvent::Completed`] was emitted.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Index currently assigned or about to be.
    pub fn index(&self) -> Option<usize> {
        match self.phase {
            Phase::Assign { index, .. } | Phase::Capture { index, .. } => Some(index),
            Phase::Finished => None,
        }
    }

    /// When the next event becomes due.
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.phase {
            Phase::Assign { at, .. } | Phase::Capture { at, .. } => Some(at),
            Phase::Finished => None,
        }
    }

    /// Take at most one due transition. Call repeatedly until `None` to catch up after a long gap.
    pub fn poll(&mut self, now: Duration) -> Option<SequenceEvent> {
        match self.phase {
            Phase::Assign { index, at } if now >= at => {
                if index >= self.len {
                    self.phase = Phase::Finished;
                    return Some(SequenceEvent::Completed);
                }
                self.phase = Phase::Capture {
                    index,
                    at: at + self.settle,
                };
                Some(SequenceEvent::Assign(index))
            }
            Phase::Capture { index, at } if now >= at => {
                self.phase = Phase::Assign {
                    index: index + 1,
                    at: at + self.step,
                };
                Some(SequenceEvent::Capture(index))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequence.rs"]
mod tests;
