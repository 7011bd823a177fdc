//! Per-frame scheduling
//!
//! A [`FrameScheduler`] runs a callback once, before the next redraw. There
//! is no repeating registration: a loop keeps itself alive by requesting the
//! next frame from inside the current one.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{PlatformError, Result};

/// One-shot frame callback
pub type FrameCallback = Box<dyn FnOnce()>;

/// The host's "run this once before the next redraw" primitive
pub trait FrameScheduler {
    /// Queue `callback` for the next frame
    fn request_frame(&self, callback: FrameCallback);
}

/// Pending frame callbacks shared by a scheduler and its clones
#[derive(Clone, Default)]
struct FrameQueue {
    pending: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
    fn push(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run the callbacks queued so far
    ///
    /// Callbacks requested while the frame runs are left for the next frame.
    fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

/// Scheduler driven explicitly by the caller
///
/// Nothing runs until [`ManualScheduler::run_frame`] is called, which makes
/// frame delivery fully deterministic in tests.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: FrameQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver one frame, returning how many callbacks ran
    pub fn run_frame(&self) -> usize {
        self.queue.run_frame()
    }

    /// Deliver up to `frames` frames, stopping early once nothing is pending
    ///
    /// Returns the number of frames that had at least one callback.
    pub fn run_frames(&self, frames: usize) -> usize {
        let mut delivered = 0;
        for _ in 0..frames {
            if self.queue.run_frame() == 0 {
                break;
            }
            delivered += 1;
        }
        delivered
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.push(callback);
    }
}

/// Single-threaded frame loop paced by the system clock
///
/// The headless counterpart of a browser's animation-frame loop: each
/// iteration delivers the pending callbacks and then sleeps for the rest of
/// the frame.
#[derive(Clone, Default)]
pub struct FrameLoop {
    queue: FrameQueue,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run frames at `fps` until nothing is pending or `max_duration` elapses
    ///
    /// Returns the number of frames delivered.
    pub fn run(&self, fps: u32, max_duration: Option<Duration>) -> Result<u64> {
        if fps == 0 {
            return Err(PlatformError::InvalidFrameRate(fps));
        }

        let frame_duration = Duration::from_micros(1_000_000 / fps as u64);
        let started = Instant::now();
        let mut frames = 0u64;

        tracing::debug!("FrameLoop: running at {} fps", fps);

        while !self.queue.is_empty() {
            if max_duration.is_some_and(|max| started.elapsed() >= max) {
                tracing::debug!("FrameLoop: duration limit reached after {} frames", frames);
                break;
            }

            let frame_start = Instant::now();
            self.queue.run_frame();
            frames += 1;

            // Sleep for remaining frame time
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        tracing::debug!("FrameLoop: finished after {} frames", frames);
        Ok(frames)
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.push(callback);
    }
}
