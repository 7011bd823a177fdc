//! Flick Platform Abstraction Layer
//!
//! The host capabilities an animation controller is driven by, expressed as
//! injectable traits instead of ambient globals:
//!
//! - [`Clock`] - monotonic wall-clock readings
//! - [`FrameScheduler`] - "run this once before the next redraw"
//!
//! # Implementations
//!
//! - [`SystemClock`] and [`FrameLoop`] - a real single-threaded host that
//!   paces frames with the system clock
//! - [`ManualClock`] and [`ManualScheduler`] - deterministic fakes for tests,
//!   advanced explicitly by the caller
//!
//! # Example
//!
//! ```ignore
//! use flick_platform::Host;
//!
//! let (host, clock, scheduler) = Host::manual();
//! host.scheduler.request_frame(Box::new(|| println!("frame")));
//! clock.advance_secs(1.0 / 60.0);
//! scheduler.run_frame();
//! ```

mod clock;
mod error;
mod host;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PlatformError, Result};
pub use host::Host;
pub use scheduler::{FrameCallback, FrameLoop, FrameScheduler, ManualScheduler};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::error::{PlatformError, Result};
    pub use crate::host::Host;
    pub use crate::scheduler::{FrameCallback, FrameLoop, FrameScheduler, ManualScheduler};
}
