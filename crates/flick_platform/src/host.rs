//! Host capability bundle

use std::rc::Rc;

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::scheduler::{FrameLoop, FrameScheduler, ManualScheduler};

/// The capabilities a controller needs from its host environment
#[derive(Clone)]
pub struct Host {
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn FrameScheduler>,
}

impl Host {
    pub fn new(clock: Rc<dyn Clock>, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self { clock, scheduler }
    }

    /// Host backed by the system clock and the given frame loop
    pub fn system(frame_loop: &FrameLoop) -> Self {
        Self::new(Rc::new(SystemClock::new()), Rc::new(frame_loop.clone()))
    }

    /// Fully manual host for tests
    ///
    /// Returns the host together with handles to drive its clock and
    /// scheduler.
    pub fn manual() -> (Self, ManualClock, ManualScheduler) {
        let clock = ManualClock::new();
        let scheduler = ManualScheduler::new();
        let host = Self::new(Rc::new(clock.clone()), Rc::new(scheduler.clone()));
        (host, clock, scheduler)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}
