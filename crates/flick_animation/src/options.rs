//! Controller configuration
//!
//! [`AnimationOptions`] is plain data: every field is optional and an absent
//! field leaves the controller untouched. Values are validated one by one
//! when applied; an invalid value is ignored and the previous one kept.
//!
//! Options deserialize from camelCase keys, so a TOML table such as
//!
//! ```toml
//! backgroundColor = "black"
//! frameCountLimit = 600
//! pauseOnLimit = true
//! ```
//!
//! can be applied directly with `AnimationController::config`.

use std::fmt;

use flick_paint::{ContextType, RenderingContext, SurfaceInfo};
use serde::{Deserialize, Serialize};

/// Per-frame callback: surface description, its rendering context, and the
/// local animation time in seconds
pub type FrameFn<C> = Box<dyn FnMut(&SurfaceInfo, &mut C, f64)>;

/// Maximum number of frames delivered in one run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameLimit {
    #[default]
    Unlimited,
    Frames(u64),
}

impl FrameLimit {
    /// Validate a raw limit
    ///
    /// NaN means unlimited, finite non-negative values are truncated to whole
    /// frames, anything else is rejected.
    pub fn from_f64(value: f64) -> Option<FrameLimit> {
        if value.is_nan() {
            Some(FrameLimit::Unlimited)
        } else if value.is_finite() && value >= 0.0 {
            Some(FrameLimit::Frames(value.trunc() as u64))
        } else {
            None
        }
    }

    /// Whether delivering frame number `frame` would go past the limit
    pub fn is_exceeded_by(&self, frame: u64) -> bool {
        match self {
            FrameLimit::Unlimited => false,
            FrameLimit::Frames(limit) => frame > *limit,
        }
    }

    pub fn as_option(&self) -> Option<u64> {
        match self {
            FrameLimit::Unlimited => None,
            FrameLimit::Frames(limit) => Some(*limit),
        }
    }
}

impl Serialize for FrameLimit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

/// Recognized controller options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Background paint: a color, `"transparent"`, or empty for none
    pub background_color: Option<String>,
    /// Clear the whole surface before each frame
    pub clear_before_drawing: Option<bool>,
    /// Local time offset of the current run
    pub time_offset_seconds: Option<f64>,
    /// Frames per run; NaN for unlimited
    pub frame_count_limit: Option<f64>,
    /// Local time at which the run ends; NaN clears the limit
    pub local_time_limit_seconds: Option<f64>,
    /// Host clock reading at which the run ends; NaN clears the limit
    pub wall_time_limit_seconds: Option<f64>,
    /// Pause instead of stopping when a limit is reached
    pub pause_on_limit: Option<bool>,
    /// `true` stops the run, `false` starts it
    pub stopped: Option<bool>,
    /// `true` pauses the run, `false` resumes it
    pub paused: Option<bool>,
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn clear_before_drawing(mut self, clear: bool) -> Self {
        self.clear_before_drawing = Some(clear);
        self
    }

    pub fn time_offset_seconds(mut self, offset: f64) -> Self {
        self.time_offset_seconds = Some(offset);
        self
    }

    pub fn frame_count_limit(mut self, limit: f64) -> Self {
        self.frame_count_limit = Some(limit);
        self
    }

    pub fn local_time_limit_seconds(mut self, limit: f64) -> Self {
        self.local_time_limit_seconds = Some(limit);
        self
    }

    pub fn wall_time_limit_seconds(mut self, deadline: f64) -> Self {
        self.wall_time_limit_seconds = Some(deadline);
        self
    }

    pub fn pause_on_limit(mut self, pause: bool) -> Self {
        self.pause_on_limit = Some(pause);
        self
    }

    pub fn stopped(mut self, stopped: bool) -> Self {
        self.stopped = Some(stopped);
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(mut self, other: AnimationOptions) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            background_color,
            clear_before_drawing,
            time_offset_seconds,
            frame_count_limit,
            local_time_limit_seconds,
            wall_time_limit_seconds,
            pause_on_limit,
            stopped,
            paused
        );
        self
    }
}

/// Everything needed to bind a controller to a surface
pub struct ControllerConfig<C> {
    /// Rendering context to obtain from the surface; defaults to 2D
    pub context_type: Option<ContextType>,
    pub options: AnimationOptions,
    pub callback: Option<FrameFn<C>>,
}

impl<C: RenderingContext> ControllerConfig<C> {
    pub fn new() -> Self {
        Self {
            context_type: None,
            options: AnimationOptions::default(),
            callback: None,
        }
    }

    pub fn context_type(mut self, context_type: ContextType) -> Self {
        self.context_type = Some(context_type);
        self
    }

    pub fn options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the per-frame callback
    pub fn on_frame<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&SurfaceInfo, &mut C, f64) + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }
}

impl<C: RenderingContext> Default for ControllerConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RenderingContext> From<AnimationOptions> for ControllerConfig<C> {
    fn from(options: AnimationOptions) -> Self {
        Self::new().options(options)
    }
}

impl<C> fmt::Debug for ControllerConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("context_type", &self.context_type)
            .field("options", &self.options)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
