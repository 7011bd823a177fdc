//! Rendering contexts
//!
//! [`RenderingContext`] is the seam between Flick and whatever actually puts
//! pixels on screen. Flick itself only ever clears and fills whole surfaces;
//! the stroke and circle operations exist for frame callbacks.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::color::Color;
use crate::error::PaintError;
use crate::geometry::{Point, Rect, Size};

/// The kind of rendering context obtained from a surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextType {
    /// A 2D canvas context
    #[default]
    TwoD,
    /// A 3D (WebGL-style) context
    WebGl,
}

impl ContextType {
    /// Parse a context type name
    ///
    /// `"2d"` selects [`ContextType::TwoD`]; `"3d"` and `"webgl"` select
    /// [`ContextType::WebGl`]. Case and surrounding whitespace are ignored.
    pub fn parse(input: &str) -> Option<ContextType> {
        let s = input.trim();
        if s.eq_ignore_ascii_case("2d") {
            Some(ContextType::TwoD)
        } else if s.eq_ignore_ascii_case("3d") || s.eq_ignore_ascii_case("webgl") {
            Some(ContextType::WebGl)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::TwoD => "2d",
            ContextType::WebGl => "webgl",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextType::parse(s).ok_or_else(|| PaintError::InvalidContextType(s.to_string()))
    }
}

/// A drawing context bound to one surface
///
/// Implemented by host backends. Coordinates are in surface pixels.
pub trait RenderingContext: Sized {
    /// Create a context of the requested type for a surface of `size`
    ///
    /// Returns `None` if the backend cannot provide that context type.
    fn create(context_type: ContextType, size: Size) -> Option<Self>;

    /// The type this context was created as
    fn context_type(&self) -> ContextType;

    /// Reset the pixels in `rect` to fully transparent
    fn clear_rect(&mut self, rect: Rect);

    /// Fill `rect` with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a connected line through `points`
    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color);

    /// Fill a circle
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
}

/// A draw operation captured by [`RecordingContext`]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Fill(Rect, Color),
    Polyline {
        points: SmallVec<[Point; 8]>,
        width: f32,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
}

/// A rendering context that records every operation
///
/// Used for headless runs and for asserting paint order in tests.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    context_type: ContextType,
    size: Size,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new(context_type: ContextType, size: Size) -> Self {
        Self {
            context_type,
            size,
            commands: Vec::new(),
        }
    }

    /// Size of the surface this context was created for
    pub fn size(&self) -> Size {
        self.size
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderingContext for RecordingContext {
    fn create(context_type: ContextType, size: Size) -> Option<Self> {
        Some(Self::new(context_type, size))
    }

    fn context_type(&self) -> ContextType {
        self.context_type
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polyline {
            points: SmallVec::from_slice(points),
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
