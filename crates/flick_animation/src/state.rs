//! Lifecycle states and read-only views of controller state

use serde::Serialize;

use crate::options::FrameLimit;

/// Where a controller is in its play/pause/stop lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// No frame is scheduled; only `start` leaves this state
    #[default]
    Stopped,
    /// Frames are delivered on every host tick
    Running,
    /// Suspended; local time is frozen until `resume`
    Paused,
}

impl Lifecycle {
    pub fn is_stopped(&self) -> bool {
        matches!(self, Lifecycle::Stopped)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Lifecycle::Paused)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Lifecycle::Running)
    }
}

/// A copy of the controller's public state
///
/// Changing state goes through the controller's explicit methods
/// (`start`, `stop`, `pause`, `resume`, `set_*`); this view never writes back.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationStateView {
    pub stopped: bool,
    pub paused: bool,
    pub time_offset_seconds: f64,
    pub frame_count_limit: FrameLimit,
    pub local_time_limit_seconds: Option<f64>,
    pub wall_time_limit_seconds: Option<f64>,
    pub pause_on_limit: bool,
    pub background_color: String,
    pub clear_before_drawing: bool,
    pub drawn_frames_count: u64,
}

/// Everything the controller knows, for inspection and debugging
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSnapshot {
    pub lifecycle: Lifecycle,
    pub state: AnimationStateView,
    pub context_type: String,
    pub surface_width: f32,
    pub surface_height: f32,
    /// Local time of the most recent frame
    pub local_time_seconds: f64,
    /// Host clock reading at which the current run began
    pub run_started_at_seconds: f64,
    pub paused_at_seconds: Option<f64>,
    pub resumed_at_seconds: Option<f64>,
    /// Whether a host tick is currently pending
    pub frame_requested: bool,
}
