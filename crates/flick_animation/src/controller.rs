//! Animation controller
//!
//! Binds a surface and a per-frame callback to the host's frame scheduler
//! and runs them through a stopped / running / paused lifecycle.
//!
//! # Frame loop
//!
//! The loop is self-perpetuating: `start` and `resume` request one host
//! tick, and each tick requests the next one only while the controller is
//! still running. Stopping or pausing never cancels a pending tick; the tick
//! fires, sees the controller is no longer running, and does nothing.
//!
//! At most one tick is pending at any time. If `start` or `resume` happens
//! while a tick is already in flight, that tick serves the new run.
//!
//! # Example
//!
//! ```ignore
//! use flick_animation::{AnimationOptions, ControllerConfig, ControllerRegistry};
//!
//! let controller = registry.create(
//!     "stage",
//!     ControllerConfig::new()
//!         .options(AnimationOptions::new().background_color("black"))
//!         .on_frame(|surface, ctx, t| draw_spinner(surface, ctx, t)),
//! )?;
//!
//! controller.pause();
//! controller.resume();
//! controller.stop(true);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use flick_paint::{Background, ContextType, RenderingContext, SharedSurface, SurfaceId, SurfaceInfo};
use flick_platform::{Clock, FrameScheduler, Host};

use crate::error::{AnimationError, Result};
use crate::options::{AnimationOptions, ControllerConfig, FrameFn, FrameLimit};
use crate::state::{AnimationSnapshot, AnimationStateView, Lifecycle};
use crate::time::TimeAccountant;

struct ControllerInner<C> {
    surface: SharedSurface<C>,
    surface_id: SurfaceId,
    context_type: ContextType,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn FrameScheduler>,
    time: TimeAccountant,
    lifecycle: Lifecycle,
    callback: Option<FrameFn<C>>,

    background: Background,
    clear_before_drawing: bool,
    frame_limit: FrameLimit,
    local_time_limit: Option<f64>,
    wall_time_limit: Option<f64>,
    pause_on_limit: bool,

    drawn_frames: u64,
    last_local_time: f64,
    frame_requested: bool,
    /// A frame is being delivered to the callback
    rendering: bool,
    /// A clear requested while the surface was busy; applied after the frame
    pending_clear: bool,
}

impl<C: RenderingContext> ControllerInner<C> {
    fn set_background(&mut self, value: &str) {
        match Background::parse(value) {
            Some(background) => self.background = background,
            None => tracing::debug!("Ignoring invalid background color {:?}", value),
        }
    }

    fn set_time_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.time.set_offset(offset);
        } else {
            tracing::debug!("Ignoring invalid time offset {}", offset);
        }
    }

    fn set_frame_limit(&mut self, limit: f64) {
        match FrameLimit::from_f64(limit) {
            Some(limit) => self.frame_limit = limit,
            None => tracing::debug!("Ignoring invalid frame count limit {}", limit),
        }
    }

    fn set_local_time_limit(&mut self, limit: f64) {
        self.local_time_limit = if limit.is_nan() { None } else { Some(limit) };
    }

    fn set_wall_time_limit(&mut self, deadline: f64) {
        if deadline.is_nan() {
            self.wall_time_limit = None;
        } else if deadline >= 0.0 {
            // A deadline in the past ends the run on the next tick
            self.wall_time_limit = Some(deadline.max(self.clock.now_secs()));
        } else {
            tracing::debug!("Ignoring invalid wall time limit {}", deadline);
        }
    }

    /// Apply every option except the lifecycle ones
    fn apply_settings(&mut self, options: &AnimationOptions) {
        if let Some(clear) = options.clear_before_drawing {
            self.clear_before_drawing = clear;
        }
        if let Some(color) = &options.background_color {
            self.set_background(color);
        }
        if let Some(offset) = options.time_offset_seconds {
            self.set_time_offset(offset);
        }
        if let Some(pause) = options.pause_on_limit {
            self.pause_on_limit = pause;
        }
        if let Some(limit) = options.local_time_limit_seconds {
            self.set_local_time_limit(limit);
        }
        if let Some(deadline) = options.wall_time_limit_seconds {
            self.set_wall_time_limit(deadline);
        }
        if let Some(limit) = options.frame_count_limit {
            self.set_frame_limit(limit);
        }
    }

    /// Check frame, wall-time and local-time limits for frame number `frame`
    ///
    /// Limits that fire are cleared.
    fn check_limits(&mut self, frame: u64, local_time: f64) -> bool {
        let mut met = false;

        if self.frame_limit.is_exceeded_by(frame) {
            met = true;
            self.frame_limit = FrameLimit::Unlimited;
            tracing::info!("Animation frame limitation met.");
        }

        if let Some(deadline) = self.wall_time_limit {
            if self.clock.now_secs() >= deadline {
                met = true;
                self.wall_time_limit = None;
                tracing::info!("Animation time limitation met.");
            }
        }

        if let Some(limit) = self.local_time_limit {
            if local_time >= limit {
                met = true;
                self.local_time_limit = None;
                tracing::info!("Animation local time limitation met.");
            }
        }

        met
    }

    fn halt(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
        self.time.mark_resume();
    }

    fn suspend(&mut self) {
        self.lifecycle = Lifecycle::Paused;
        self.time.mark_pause();
    }
}

/// Outcome of the bookkeeping part of a tick
enum TickPlan {
    Skip,
    Draw(f64),
}

/// Play/pause/stop controller for one surface
///
/// Cloning yields another handle to the same controller; use
/// [`AnimationController::ptr_eq`] to compare identity.
pub struct AnimationController<C: RenderingContext + 'static> {
    inner: Rc<RefCell<ControllerInner<C>>>,
}

impl<C: RenderingContext + 'static> Clone for AnimationController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: RenderingContext + 'static> AnimationController<C> {
    /// Bind a new controller to `surface`
    ///
    /// Obtains the rendering context, applies the options, and starts the
    /// loop unless the options say `stopped`. This does not consult any
    /// registry; use `ControllerRegistry::create` to keep one controller per
    /// surface.
    pub fn new(host: &Host, surface: SharedSurface<C>, config: ControllerConfig<C>) -> Result<Self> {
        let ControllerConfig {
            context_type,
            options,
            callback,
        } = config;
        let context_type = context_type.unwrap_or_default();

        let surface_id = {
            let mut guard = surface.borrow_mut();
            if guard.get_context(context_type).is_none() {
                tracing::error!(
                    "Surface {:?} cannot provide a {} context",
                    guard.id(),
                    context_type
                );
                return Err(AnimationError::ContextUnavailable(context_type));
            }
            guard.id()
        };

        let controller = Self {
            inner: Rc::new(RefCell::new(ControllerInner {
                surface,
                surface_id,
                context_type,
                clock: Rc::clone(&host.clock),
                scheduler: Rc::clone(&host.scheduler),
                time: TimeAccountant::new(Rc::clone(&host.clock)),
                lifecycle: Lifecycle::Stopped,
                callback,
                background: Background::None,
                clear_before_drawing: true,
                frame_limit: FrameLimit::Unlimited,
                local_time_limit: None,
                wall_time_limit: None,
                pause_on_limit: false,
                drawn_frames: 0,
                last_local_time: 0.0,
                frame_requested: false,
                rendering: false,
                pending_clear: false,
            })),
        };

        let offset = {
            let mut inner = controller.inner.borrow_mut();
            inner.apply_settings(&options);
            inner.time.offset()
        };

        tracing::debug!(
            "AnimationController: bound to surface {:?} ({} context)",
            surface_id,
            context_type
        );

        if options.stopped != Some(true) {
            controller.start(Some(offset));
            if options.paused == Some(true) {
                controller.pause();
            }
        }

        Ok(controller)
    }

    /// Whether both handles refer to the same controller
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Apply options and, optionally, a new callback
    ///
    /// Invalid values are ignored. `stopped` and `paused` map to the
    /// lifecycle operations. The context type cannot change after binding.
    pub fn config(&self, config: impl Into<ControllerConfig<C>>) -> &Self {
        let ControllerConfig {
            context_type,
            options,
            callback,
        } = config.into();

        {
            let mut inner = self.inner.borrow_mut();
            if let Some(requested) = context_type {
                if requested != inner.context_type {
                    tracing::warn!(
                        "Context type is fixed at {}; ignoring {}",
                        inner.context_type,
                        requested
                    );
                }
            }
            if callback.is_some() {
                inner.callback = callback;
            }
            if let Some(clear) = options.clear_before_drawing {
                inner.clear_before_drawing = clear;
            }
            if let Some(color) = &options.background_color {
                inner.set_background(color);
            }
        }

        if let Some(stopped) = options.stopped {
            self.set_stopped(stopped);
        }
        if let Some(paused) = options.paused {
            self.set_paused(paused);
        }

        let remaining = AnimationOptions {
            time_offset_seconds: options.time_offset_seconds,
            pause_on_limit: options.pause_on_limit,
            local_time_limit_seconds: options.local_time_limit_seconds,
            wall_time_limit_seconds: options.wall_time_limit_seconds,
            frame_count_limit: options.frame_count_limit,
            ..AnimationOptions::default()
        };
        self.inner.borrow_mut().apply_settings(&remaining);

        self
    }

    /// Replace the per-frame callback
    pub fn set_callback<F>(&self, callback: F) -> &Self
    where
        F: FnMut(&SurfaceInfo, &mut C, f64) + 'static,
    {
        self.inner.borrow_mut().callback = Some(Box::new(callback));
        self
    }

    pub fn has_callback(&self) -> bool {
        self.inner.borrow().callback.is_some()
    }

    /// Set the background paint; malformed colors are ignored
    pub fn set_background_color(&self, color: &str) -> &Self {
        self.inner.borrow_mut().set_background(color);
        self
    }

    pub fn set_clear_before_drawing(&self, clear: bool) -> &Self {
        self.inner.borrow_mut().clear_before_drawing = clear;
        self
    }

    /// Change the offset of the current run; non-finite values are ignored
    pub fn set_time_offset_seconds(&self, offset: f64) -> &Self {
        self.inner.borrow_mut().set_time_offset(offset);
        self
    }

    /// NaN for unlimited; negative or infinite values are ignored
    pub fn set_frame_count_limit(&self, limit: f64) -> &Self {
        self.inner.borrow_mut().set_frame_limit(limit);
        self
    }

    /// NaN clears the limit
    pub fn set_local_time_limit_seconds(&self, limit: f64) -> &Self {
        self.inner.borrow_mut().set_local_time_limit(limit);
        self
    }

    /// Host clock deadline; NaN clears it, negative values are ignored
    pub fn set_wall_time_limit_seconds(&self, deadline: f64) -> &Self {
        self.inner.borrow_mut().set_wall_time_limit(deadline);
        self
    }

    pub fn set_pause_on_limit(&self, pause: bool) -> &Self {
        self.inner.borrow_mut().pause_on_limit = pause;
        self
    }

    /// `true` stops the run, `false` starts a fresh one
    pub fn set_stopped(&self, stopped: bool) -> &Self {
        if stopped {
            self.stop(false)
        } else {
            self.start(None)
        }
    }

    /// `true` pauses the run, `false` resumes it
    pub fn set_paused(&self, paused: bool) -> &Self {
        if paused {
            self.pause()
        } else {
            self.resume()
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn get_surface(&self) -> SharedSurface<C> {
        Rc::clone(&self.inner.borrow().surface)
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.inner.borrow().surface_id
    }

    pub fn get_context_type(&self) -> ContextType {
        self.inner.borrow().context_type
    }

    /// Run `f` with the surface's rendering context
    ///
    /// Returns `None` if the surface is busy (borrowed by a frame in
    /// progress) or has no context.
    pub fn with_rendering_context<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let surface = self.get_surface();
        let mut surface = surface.try_borrow_mut().ok()?;
        surface.context_mut().map(f)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.borrow().lifecycle
    }

    pub fn is_stopped(&self) -> bool {
        self.lifecycle().is_stopped()
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle().is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    pub fn drawn_frames_count(&self) -> u64 {
        self.inner.borrow().drawn_frames
    }

    pub fn time_offset_seconds(&self) -> f64 {
        self.inner.borrow().time.offset()
    }

    pub fn frame_count_limit(&self) -> FrameLimit {
        self.inner.borrow().frame_limit
    }

    pub fn background(&self) -> Background {
        self.inner.borrow().background
    }

    /// Local animation time right now
    pub fn local_time(&self) -> f64 {
        self.inner.borrow().time.now()
    }

    /// Local time handed to the most recent frame
    pub fn last_local_time(&self) -> f64 {
        self.inner.borrow().last_local_time
    }

    /// Copy of the public state
    pub fn state(&self) -> AnimationStateView {
        let inner = self.inner.borrow();
        AnimationStateView {
            stopped: inner.lifecycle.is_stopped(),
            paused: inner.lifecycle.is_paused(),
            time_offset_seconds: inner.time.offset(),
            frame_count_limit: inner.frame_limit,
            local_time_limit_seconds: inner.local_time_limit,
            wall_time_limit_seconds: inner.wall_time_limit,
            pause_on_limit: inner.pause_on_limit,
            background_color: inner.background.to_string(),
            clear_before_drawing: inner.clear_before_drawing,
            drawn_frames_count: inner.drawn_frames,
        }
    }

    /// Full inspection snapshot
    pub fn snapshot(&self) -> AnimationSnapshot {
        let state = self.state();
        let inner = self.inner.borrow();
        let size = inner
            .surface
            .try_borrow()
            .map(|s| s.size())
            .unwrap_or_default();
        AnimationSnapshot {
            lifecycle: inner.lifecycle,
            state,
            context_type: inner.context_type.to_string(),
            surface_width: size.width,
            surface_height: size.height,
            local_time_seconds: inner.last_local_time,
            run_started_at_seconds: inner.time.run_start(),
            paused_at_seconds: inner.time.paused_at(),
            resumed_at_seconds: inner.time.resumed_at(),
            frame_requested: inner.frame_requested,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start a fresh run with local time beginning at `offset` (or zero)
    ///
    /// No-op while running. From paused this restarts rather than resumes.
    pub fn start(&self, offset: Option<f64>) -> &Self {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.lifecycle.is_running() {
                return self;
            }

            let offset = offset.filter(|o| o.is_finite()).unwrap_or(0.0);
            inner.lifecycle = Lifecycle::Running;
            inner.drawn_frames = 0;
            inner.time.begin(offset);
            inner.last_local_time = offset;
            tracing::debug!("Animation started at local time {}", offset);
        }

        self.request_next_frame();
        self
    }

    /// Stop the run, optionally clearing the surface first
    pub fn stop(&self, clear_first: bool) -> &Self {
        if clear_first {
            self.clear();
        }

        let mut inner = self.inner.borrow_mut();
        if !inner.lifecycle.is_stopped() {
            tracing::debug!("Animation stopped after {} frames", inner.drawn_frames);
        }
        inner.halt();
        drop(inner);
        self
    }

    /// Suspend a running animation; no-op otherwise
    pub fn pause(&self) -> &Self {
        let mut inner = self.inner.borrow_mut();
        if inner.lifecycle.is_running() {
            inner.suspend();
            tracing::debug!("Animation paused at local time {}", inner.time.now());
        }
        drop(inner);
        self
    }

    /// Continue a paused animation; no-op otherwise
    pub fn resume(&self) -> &Self {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.lifecycle.is_paused() {
                return self;
            }
            let paused_for = inner.time.mark_resume();
            inner.lifecycle = Lifecycle::Running;
            tracing::debug!("Animation resumed after {:.3}s paused", paused_for);
        }

        self.request_next_frame();
        self
    }

    /// Clear the whole surface and stop the run
    pub fn clear_surface(&self) -> &Self {
        self.clear();
        self.stop(false)
    }

    // =========================================================================
    // Manual frames
    // =========================================================================

    /// Draw one frame at the current local time, outside the loop
    ///
    /// Does not count toward the frame limit and schedules nothing.
    pub fn draw_one_frame(&self) -> &Self {
        let local_time = {
            let mut inner = self.inner.borrow_mut();
            let t = inner.time.now();
            inner.last_local_time = t;
            t
        };
        self.render(local_time);
        self
    }

    /// Draw one frame at local time `t`, then hold there paused
    ///
    /// A later `resume` continues from `t`. Non-finite times are ignored.
    pub fn draw_one_frame_on_time(&self, t: f64) -> &Self {
        if !t.is_finite() {
            tracing::debug!("Ignoring draw at non-finite time {}", t);
            return self;
        }

        self.render(t);

        let mut inner = self.inner.borrow_mut();
        inner.time.seek_paused(t);
        inner.last_local_time = t;
        inner.lifecycle = Lifecycle::Paused;
        drop(inner);
        self
    }

    // =========================================================================
    // Frame loop internals
    // =========================================================================

    fn clear(&self) {
        let surface = self.get_surface();
        match surface.try_borrow_mut() {
            Ok(mut surface) => surface.clear(),
            Err(_) => {
                tracing::debug!("Surface is busy; clearing once the current frame ends");
                self.inner.borrow_mut().pending_clear = true;
            }
        };
    }

    /// Ask the host for one tick unless one is already pending
    fn request_next_frame(&self) {
        let scheduler = {
            let mut inner = self.inner.borrow_mut();
            if inner.frame_requested || !inner.lifecycle.is_running() {
                return;
            }
            inner.frame_requested = true;
            Rc::clone(&inner.scheduler)
        };

        let weak: Weak<RefCell<ControllerInner<C>>> = Rc::downgrade(&self.inner);
        scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                AnimationController { inner }.tick();
            }
        }));
    }

    /// One host tick
    fn tick(&self) {
        let plan = {
            let mut inner = self.inner.borrow_mut();
            inner.frame_requested = false;
            self.plan_tick(&mut inner)
        };

        let TickPlan::Draw(local_time) = plan else {
            return;
        };

        self.render(local_time);
        self.request_next_frame();
    }

    fn plan_tick(&self, inner: &mut ControllerInner<C>) -> TickPlan {
        if !inner.lifecycle.is_running() {
            return TickPlan::Skip;
        }

        if inner.callback.is_none() {
            tracing::info!("The frame callback is not provided yet. Animation will not start.");
            inner.halt();
            return TickPlan::Skip;
        }

        inner.drawn_frames += 1;
        let frame = inner.drawn_frames;
        let local_time = inner.time.now();

        if inner.check_limits(frame, local_time) {
            if inner.pause_on_limit {
                tracing::info!("Animation will pause now.");
                inner.suspend();
            } else {
                tracing::info!("Animation will stop now.");
                inner.halt();
            }
            return TickPlan::Skip;
        }

        inner.last_local_time = local_time;
        TickPlan::Draw(local_time)
    }

    /// Paint the background and deliver one frame to the callback
    ///
    /// The controller is not borrowed while the callback runs, so the
    /// callback may call back into it.
    fn render(&self, local_time: f64) {
        let (surface, mut callback, clear_first, background) = {
            let mut inner = self.inner.borrow_mut();
            let Some(callback) = inner.callback.take() else {
                if inner.rendering {
                    tracing::debug!("A frame is already being drawn; nested draw skipped");
                } else {
                    tracing::info!("The frame callback is not provided yet. Nothing to draw.");
                }
                return;
            };
            inner.rendering = true;
            (
                Rc::clone(&inner.surface),
                callback,
                inner.clear_before_drawing,
                inner.background,
            )
        };

        match surface.try_borrow_mut() {
            Ok(mut surface) => {
                if clear_first {
                    surface.clear();
                }
                if let Some(color) = background.fill_color() {
                    surface.fill(color);
                }
                match surface.frame_parts() {
                    Some((info, ctx)) => callback(&info, ctx, local_time),
                    None => tracing::warn!("Surface has no rendering context; frame skipped"),
                }
                if std::mem::take(&mut self.inner.borrow_mut().pending_clear) {
                    surface.clear();
                }
            }
            Err(_) => tracing::warn!("Surface is busy; frame skipped"),
        }

        // Keep a callback installed while this one was running
        let mut inner = self.inner.borrow_mut();
        inner.rendering = false;
        if inner.callback.is_none() {
            inner.callback = Some(callback);
        }
    }
}

impl<C: RenderingContext + 'static> std::fmt::Debug for AnimationController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("AnimationController")
                .field("surface", &inner.surface_id)
                .field("lifecycle", &inner.lifecycle)
                .field("drawn_frames", &inner.drawn_frames)
                .finish_non_exhaustive(),
            Err(_) => f.write_str("AnimationController { <busy> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_paint::{Color, DrawCommand, Point, RecordingContext, Rect, Size, SurfaceTable};
    use flick_platform::{ManualClock, ManualScheduler};
    use std::cell::Cell;

    const EPS: f64 = 1e-9;

    struct Fixture {
        host: Host,
        clock: ManualClock,
        scheduler: ManualScheduler,
        surface: SharedSurface<RecordingContext>,
        _table: SurfaceTable<RecordingContext>,
    }

    fn fixture() -> Fixture {
        let (host, clock, scheduler) = Host::manual();
        let mut table = SurfaceTable::new();
        let surface = table.create(Some("stage"), Size::new(40.0, 20.0)).unwrap();
        Fixture {
            host,
            clock,
            scheduler,
            surface,
            _table: table,
        }
    }

    /// Config whose callback records every local time it sees
    fn recording_config(
        options: AnimationOptions,
    ) -> (ControllerConfig<RecordingContext>, Rc<RefCell<Vec<f64>>>) {
        let times = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&times);
        let config = ControllerConfig::new()
            .options(options)
            .on_frame(move |_, _, t| sink.borrow_mut().push(t));
        (config, times)
    }

    fn frame(f: &Fixture) -> usize {
        f.clock.advance_secs(1.0 / 60.0);
        f.scheduler.run_frame()
    }

    #[test]
    fn test_new_starts_by_default() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        assert!(controller.is_running());
        assert_eq!(f.scheduler.pending(), 1);

        frame(&f);
        frame(&f);
        assert_eq!(times.borrow().len(), 2);
        assert_eq!(controller.drawn_frames_count(), 2);
    }

    #[test]
    fn test_new_respects_stopped_option() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        assert!(controller.is_stopped());
        assert_eq!(f.scheduler.pending(), 0);
        assert!(times.borrow().is_empty());
    }

    #[test]
    fn test_new_with_paused_option_starts_then_pauses() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new().paused(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        assert!(controller.is_paused());
        frame(&f);
        assert!(times.borrow().is_empty());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_offset_scenario() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().time_offset_seconds(2.0));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        assert!((controller.local_time() - 2.0).abs() < EPS);

        f.clock.advance_secs(1.0);
        assert!((controller.local_time() - 3.0).abs() < EPS);

        controller.pause();
        f.clock.advance_secs(5.0);
        controller.resume();
        f.clock.advance_secs(0.5);
        assert!((controller.local_time() - 3.5).abs() < EPS);
    }

    #[test]
    fn test_pause_resume_continuity() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        frame(&f);
        frame(&f);
        let before = controller.local_time();
        controller.pause();

        for _ in 0..10 {
            f.clock.advance_secs(1.0);
            f.scheduler.run_frame();
        }

        controller.resume();
        assert!((controller.local_time() - before).abs() < EPS);
        assert_eq!(times.borrow().len(), 2);

        frame(&f);
        let last = *times.borrow().last().unwrap();
        assert!((last - (before + 1.0 / 60.0)).abs() < 1e-6);
    }

    #[test]
    fn test_frame_count_limit_stops_after_three_frames() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new().frame_count_limit(3.0));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        for _ in 0..10 {
            frame(&f);
        }

        assert_eq!(times.borrow().len(), 3);
        assert!(controller.is_stopped());
        // The fourth tick counted, found the limit exceeded, and drew nothing
        assert_eq!(controller.drawn_frames_count(), 4);
        assert_eq!(f.scheduler.pending(), 0);
        // The limit fires once
        assert_eq!(controller.frame_count_limit(), FrameLimit::Unlimited);
    }

    #[test]
    fn test_unlimited_frame_count_never_stops() {
        let f = fixture();
        let (config, times) =
            recording_config(AnimationOptions::new().frame_count_limit(f64::NAN));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        for _ in 0..100 {
            frame(&f);
        }
        assert_eq!(times.borrow().len(), 100);
        assert!(controller.is_running());
    }

    #[test]
    fn test_frame_limit_can_pause_instead_of_stop() {
        let f = fixture();
        let (config, times) = recording_config(
            AnimationOptions::new()
                .frame_count_limit(2.0)
                .pause_on_limit(true),
        );
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        for _ in 0..5 {
            frame(&f);
        }
        assert!(controller.is_paused());
        assert_eq!(times.borrow().len(), 2);

        controller.resume();
        frame(&f);
        assert_eq!(times.borrow().len(), 3);
        assert!(controller.is_running());
    }

    #[test]
    fn test_local_time_limit() {
        let f = fixture();
        let (config, times) =
            recording_config(AnimationOptions::new().local_time_limit_seconds(1.0));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        f.clock.advance_secs(0.5);
        f.scheduler.run_frame();
        f.clock.advance_secs(0.6);
        f.scheduler.run_frame();

        assert_eq!(times.borrow().len(), 1);
        assert!(controller.is_stopped());
        assert_eq!(controller.state().local_time_limit_seconds, None);
    }

    #[test]
    fn test_wall_time_limit_pauses() {
        let f = fixture();
        f.clock.advance_secs(100.0);
        let (config, times) = recording_config(
            AnimationOptions::new()
                .wall_time_limit_seconds(101.0)
                .pause_on_limit(true),
        );
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        f.clock.advance_secs(0.5);
        f.scheduler.run_frame();
        f.clock.advance_secs(0.5);
        f.scheduler.run_frame();

        assert_eq!(times.borrow().len(), 1);
        assert!(controller.is_paused());
    }

    #[test]
    fn test_past_wall_deadline_is_clamped_to_now() {
        let f = fixture();
        f.clock.advance_secs(50.0);
        let (config, times) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.set_wall_time_limit_seconds(10.0);
        assert_eq!(controller.state().wall_time_limit_seconds, Some(50.0));

        controller.start(None);
        frame(&f);
        assert!(times.borrow().is_empty());
        assert!(controller.is_stopped());
    }

    #[test]
    fn test_start_resets_counter_and_offset() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().time_offset_seconds(4.0));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        frame(&f);
        frame(&f);
        controller.pause();
        controller.start(None);

        assert!(controller.is_running());
        assert_eq!(controller.drawn_frames_count(), 0);
        assert!(controller.local_time().abs() < EPS);

        controller.stop(false);
        controller.start(Some(7.5));
        assert!((controller.local_time() - 7.5).abs() < EPS);
        assert!(!controller.state().stopped);
    }

    #[test]
    fn test_start_ignores_non_finite_offset() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.start(Some(f64::NAN));
        assert!(controller.local_time().abs() < EPS);
    }

    #[test]
    fn test_double_start_is_noop() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        f.clock.advance_secs(1.0);
        controller.start(Some(9.0));
        assert!((controller.local_time() - 1.0).abs() < EPS);
        assert_eq!(f.scheduler.pending(), 1);
    }

    #[test]
    fn test_pause_and_resume_noops() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        let before = controller.state();
        controller.pause();
        assert_eq!(controller.state(), before);
        controller.resume();
        assert_eq!(controller.state(), before);

        controller.start(None);
        let running = controller.state();
        controller.resume();
        assert_eq!(controller.state(), running);
        assert_eq!(f.scheduler.pending(), 1);
    }

    #[test]
    fn test_at_most_one_tick_pending() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.pause();
        controller.resume();
        controller.stop(false);
        controller.start(None);
        controller.pause();
        controller.resume();
        assert_eq!(f.scheduler.pending(), 1);

        frame(&f);
        assert_eq!(times.borrow().len(), 1);
        assert_eq!(f.scheduler.pending(), 1);
    }

    #[test]
    fn test_stop_lets_pending_tick_noop() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.stop(false);
        assert_eq!(f.scheduler.pending(), 1);
        frame(&f);
        assert!(times.borrow().is_empty());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_missing_callback_stops_on_first_tick() {
        let f = fixture();
        let controller =
            AnimationController::new(&f.host, Rc::clone(&f.surface), ControllerConfig::new())
                .unwrap();

        assert!(controller.is_running());
        frame(&f);
        assert!(controller.is_stopped());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_background_fill_before_callback() {
        let f = fixture();
        let order = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&order);
        let config = ControllerConfig::new()
            .options(
                AnimationOptions::new()
                    .background_color("red")
                    .clear_before_drawing(false),
            )
            .on_frame(move |_, ctx: &mut RecordingContext, _| {
                sink.borrow_mut().push(ctx.commands().to_vec());
                ctx.take_commands();
            });
        let _controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        frame(&f);
        frame(&f);

        let bounds = Rect::new(0.0, 0.0, 40.0, 20.0);
        let seen = order.borrow();
        assert_eq!(seen.len(), 2);
        for commands in seen.iter() {
            assert_eq!(commands, &vec![DrawCommand::Fill(bounds, Color::RED)]);
        }
    }

    #[test]
    fn test_transparent_background_without_clear_paints_nothing() {
        let f = fixture();
        let (config, times) = recording_config(
            AnimationOptions::new()
                .background_color("transparent")
                .clear_before_drawing(false),
        );
        let _controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        frame(&f);
        assert_eq!(times.borrow().len(), 1);
        let surface = f.surface.borrow();
        assert!(surface.context().unwrap().commands().is_empty());
    }

    #[test]
    fn test_clear_happens_before_fill() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().background_color("#0000ff"));
        let _controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        frame(&f);
        let bounds = Rect::new(0.0, 0.0, 40.0, 20.0);
        let surface = f.surface.borrow();
        assert_eq!(
            surface.context().unwrap().commands(),
            &[DrawCommand::Clear(bounds), DrawCommand::Fill(bounds, Color::BLUE)]
        );
    }

    #[test]
    fn test_draw_one_frame_on_time() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.draw_one_frame_on_time(5.0);
        assert_eq!(*times.borrow(), vec![5.0]);
        assert!(controller.state().paused);

        // The tick requested by start fires but draws nothing
        frame(&f);
        frame(&f);
        assert_eq!(times.borrow().len(), 1);
        assert_eq!(f.scheduler.pending(), 0);

        f.clock.advance_secs(3.0);
        assert!((controller.local_time() - 5.0).abs() < EPS);
        controller.resume();
        f.clock.advance_secs(0.25);
        assert!((controller.local_time() - 5.25).abs() < EPS);
    }

    #[test]
    fn test_draw_one_frame_does_not_count_or_schedule() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.draw_one_frame();
        assert_eq!(times.borrow().len(), 1);
        assert_eq!(controller.drawn_frames_count(), 0);
        assert_eq!(f.scheduler.pending(), 0);
        assert!(controller.is_stopped());
    }

    #[test]
    fn test_config_applies_and_ignores_invalid_values() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.config(
            AnimationOptions::new()
                .background_color("black")
                .frame_count_limit(12.0)
                .time_offset_seconds(1.0),
        );
        controller.config(
            AnimationOptions::new()
                .background_color("not a color")
                .frame_count_limit(-4.0)
                .time_offset_seconds(f64::INFINITY),
        );

        let state = controller.state();
        assert_eq!(state.background_color, "#000000");
        assert_eq!(state.frame_count_limit, FrameLimit::Frames(12));
        assert_eq!(state.time_offset_seconds, 1.0);
        assert!(state.clear_before_drawing);
    }

    #[test]
    fn test_config_lifecycle_options_and_chaining() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().stopped(true));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.config(AnimationOptions::new().stopped(false)).pause();
        assert!(controller.is_paused());

        controller.set_paused(false);
        assert!(controller.is_running());
        controller.set_stopped(true);
        assert!(controller.is_stopped());
    }

    #[test]
    fn test_config_replaces_callback() {
        let f = fixture();
        let (config, first) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        frame(&f);

        let second = Rc::new(Cell::new(0));
        let counter = Rc::clone(&second);
        controller.config(
            ControllerConfig::<RecordingContext>::new()
                .on_frame(move |_, _, _| counter.set(counter.get() + 1)),
        );
        frame(&f);
        frame(&f);

        assert_eq!(first.borrow().len(), 1);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn test_callback_may_stop_its_own_controller() {
        let f = fixture();
        let slot: Rc<RefCell<Option<AnimationController<RecordingContext>>>> =
            Rc::new(RefCell::new(None));
        let handle = Rc::clone(&slot);
        let config = ControllerConfig::new().on_frame(move |_, _, t| {
            if t > 0.04 {
                if let Some(controller) = handle.borrow().as_ref() {
                    controller.stop(false);
                }
            }
        });
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        *slot.borrow_mut() = Some(controller.clone());

        for _ in 0..10 {
            frame(&f);
        }

        assert!(controller.is_stopped());
        assert_eq!(controller.drawn_frames_count(), 3);
        assert_eq!(f.scheduler.pending(), 0);
        slot.borrow_mut().take();
    }

    #[test]
    fn test_clear_surface_clears_and_stops() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new().clear_before_drawing(false));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.clear_surface();
        assert!(controller.is_stopped());
        let commands = controller
            .with_rendering_context(|ctx| ctx.take_commands())
            .unwrap();
        assert_eq!(commands, vec![DrawCommand::Clear(Rect::new(0.0, 0.0, 40.0, 20.0))]);
    }

    #[test]
    fn test_stop_with_clear_clears_then_stops() {
        let f = fixture();
        let (config, times) =
            recording_config(AnimationOptions::new().clear_before_drawing(false));
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();

        controller.stop(true);
        assert!(controller.is_stopped());
        let commands = controller
            .with_rendering_context(|ctx| ctx.take_commands())
            .unwrap();
        assert_eq!(commands, vec![DrawCommand::Clear(Rect::new(0.0, 0.0, 40.0, 20.0))]);

        frame(&f);
        assert!(times.borrow().is_empty());
    }

    #[test]
    fn test_stop_with_clear_from_callback_clears_after_frame() {
        let f = fixture();
        let slot: Rc<RefCell<Option<AnimationController<RecordingContext>>>> =
            Rc::new(RefCell::new(None));
        let handle = Rc::clone(&slot);
        let config = ControllerConfig::<RecordingContext>::new()
            .options(AnimationOptions::new().clear_before_drawing(false))
            .on_frame(move |_, ctx, _| {
                ctx.fill_circle(Point::new(1.0, 1.0), 1.0, Color::RED);
                if let Some(controller) = handle.borrow().as_ref() {
                    controller.stop(true);
                }
            });
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        *slot.borrow_mut() = Some(controller.clone());

        frame(&f);

        assert!(controller.is_stopped());
        let commands = controller
            .with_rendering_context(|ctx| ctx.take_commands())
            .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Clear(Rect::new(0.0, 0.0, 40.0, 20.0)))
        );

        // The deferred clear is applied once, not on later frames
        controller.start(None);
        slot.borrow_mut().take();
        frame(&f);
        let commands = controller
            .with_rendering_context(|ctx| ctx.take_commands())
            .unwrap();
        assert!(!commands.contains(&DrawCommand::Clear(Rect::new(0.0, 0.0, 40.0, 20.0))));
    }

    #[test]
    fn test_nested_draw_from_callback_is_skipped() {
        let f = fixture();
        let slot: Rc<RefCell<Option<AnimationController<RecordingContext>>>> =
            Rc::new(RefCell::new(None));
        let handle = Rc::clone(&slot);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let config = ControllerConfig::<RecordingContext>::new().on_frame(move |_, _, _| {
            counter.set(counter.get() + 1);
            if let Some(controller) = handle.borrow().as_ref() {
                controller.draw_one_frame();
            }
        });
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        *slot.borrow_mut() = Some(controller.clone());

        frame(&f);
        frame(&f);

        assert_eq!(calls.get(), 2);
        assert!(controller.has_callback());
        assert!(controller.is_running());
        slot.borrow_mut().take();
    }

    #[test]
    fn test_dropped_controller_leaves_harmless_tick() {
        let f = fixture();
        let (config, times) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        drop(controller);

        frame(&f);
        assert!(times.borrow().is_empty());
        assert_eq!(f.scheduler.pending(), 0);
    }

    #[test]
    fn test_context_unavailable() {
        let f = fixture();
        f.surface.borrow_mut().get_context(ContextType::TwoD);
        let err = AnimationController::new(
            &f.host,
            Rc::clone(&f.surface),
            ControllerConfig::<RecordingContext>::new().context_type(ContextType::WebGl),
        )
        .unwrap_err();
        assert_eq!(err, AnimationError::ContextUnavailable(ContextType::WebGl));
    }

    #[test]
    fn test_snapshot_reports_lifecycle() {
        let f = fixture();
        let (config, _) = recording_config(AnimationOptions::new());
        let controller = AnimationController::new(&f.host, Rc::clone(&f.surface), config).unwrap();
        frame(&f);
        controller.pause();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.lifecycle, Lifecycle::Paused);
        assert_eq!(snapshot.context_type, "2d");
        assert_eq!(snapshot.surface_width, 40.0);
        assert!(snapshot.paused_at_seconds.is_some());
        assert!(snapshot.frame_requested);
    }
}
