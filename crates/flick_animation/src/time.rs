//! Local animation time
//!
//! [`TimeAccountant`] maps host clock readings to the local time handed to
//! frame callbacks:
//!
//! ```text
//! local = (wall - run_start) + offset
//! ```
//!
//! While paused the wall reading is frozen at the pause instant. Resuming
//! subtracts the paused duration from `offset`, so local time continues from
//! exactly where it stopped.

use std::rc::Rc;

use flick_platform::Clock;

/// Converts wall-clock readings into local animation time, in seconds
pub struct TimeAccountant {
    clock: Rc<dyn Clock>,
    run_start: f64,
    offset: f64,
    paused_at: Option<f64>,
    resumed_at: Option<f64>,
}

impl TimeAccountant {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        let now = clock.now_secs();
        Self {
            clock,
            run_start: now,
            offset: 0.0,
            paused_at: None,
            resumed_at: None,
        }
    }

    /// Current host clock reading in seconds
    pub fn wall_now(&self) -> f64 {
        self.clock.now_secs()
    }

    /// Start a new run whose local time begins at `offset`
    pub fn begin(&mut self, offset: f64) {
        self.run_start = self.wall_now();
        self.offset = offset;
        self.paused_at = None;
        self.resumed_at = None;
    }

    /// Freeze local time at the current instant
    pub fn mark_pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(self.wall_now());
        }
    }

    /// Unfreeze local time, discounting the paused interval
    ///
    /// Returns the paused duration in seconds (zero if not paused).
    pub fn mark_resume(&mut self) -> f64 {
        let Some(paused_at) = self.paused_at.take() else {
            return 0.0;
        };
        let now = self.wall_now();
        let paused_for = now - paused_at;
        self.offset -= paused_for;
        self.resumed_at = Some(now);
        paused_for
    }

    /// Jump to local time `t` and stay frozen there
    pub fn seek_paused(&mut self, t: f64) {
        let now = self.wall_now();
        self.run_start = now;
        self.offset = t;
        self.paused_at = Some(now);
    }

    /// Local animation time for "now"
    pub fn now(&self) -> f64 {
        let wall = self.paused_at.unwrap_or_else(|| self.wall_now());
        (wall - self.run_start) + self.offset
    }

    /// Current offset, including pause adjustments
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Replace the offset of the current run
    ///
    /// Takes effect immediately: local time jumps by the difference.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Wall reading at which the current run began
    pub fn run_start(&self) -> f64 {
        self.run_start
    }

    pub fn paused_at(&self) -> Option<f64> {
        self.paused_at
    }

    pub fn resumed_at(&self) -> Option<f64> {
        self.resumed_at
    }
}

impl std::fmt::Debug for TimeAccountant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeAccountant")
            .field("run_start", &self.run_start)
            .field("offset", &self.offset)
            .field("paused_at", &self.paused_at)
            .finish()
    }
}
