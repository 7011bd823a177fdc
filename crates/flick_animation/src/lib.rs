//! Flick Animation Controller
//!
//! Drives a per-frame drawing callback on a surface with a play / pause /
//! stop lifecycle, tracking a local animation time that survives pauses.
//!
//! # Features
//!
//! - **Time Accountant**: wall-clock to local-time mapping with offset and
//!   pause compensation
//! - **Animation Controller**: self-scheduling frame loop, background
//!   clear/fill, frame and time limits, single-frame drawing
//! - **Controller Registry**: one controller per surface, explicit lookup
//! - **Options**: serde-loadable configuration applied field by field
//!
//! # Example
//!
//! ```ignore
//! use flick_animation::{AnimationOptions, ControllerConfig, ControllerRegistry};
//! use flick_paint::{RecordingContext, Size};
//! use flick_platform::{FrameLoop, Host};
//!
//! let frame_loop = FrameLoop::new();
//! let mut registry = ControllerRegistry::<RecordingContext>::new(Host::system(&frame_loop));
//! registry.create_surface(Some("stage"), Size::new(300.0, 150.0))?;
//!
//! registry.create(
//!     "stage",
//!     ControllerConfig::new()
//!         .options(AnimationOptions::new().frame_count_limit(120.0))
//!         .on_frame(|surface, ctx, t| { /* draw */ }),
//! )?;
//!
//! frame_loop.run(60, None)?;
//! ```

pub mod args;
pub mod controller;
pub mod error;
pub mod options;
pub mod registry;
pub mod state;
pub mod time;

pub use args::{resolve_args, ControllerArg};
pub use controller::AnimationController;
pub use error::{AnimationError, ArgumentKind, Result};
pub use options::{AnimationOptions, ControllerConfig, FrameFn, FrameLimit};
pub use registry::{ControllerRegistry, SurfaceRef};
pub use state::{AnimationSnapshot, AnimationStateView, Lifecycle};
pub use time::TimeAccountant;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        AnimationController, AnimationOptions, ControllerConfig, ControllerRegistry, Lifecycle,
    };
}
