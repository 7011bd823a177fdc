//! Flick Paint Surface
//!
//! The drawing-side boundary of Flick: everything an animation controller
//! needs to know about the surface it paints on, and nothing more.
//!
//! # Features
//!
//! - **Colors**: RGBA colors parsed from CSS-style strings
//! - **Backgrounds**: empty / `transparent` / solid color paint modes
//! - **Surfaces**: identity, size, and a lazily obtained rendering context
//! - **Surface Table**: identifier lookup for surfaces (the host "document")
//! - **Recording Context**: a `RenderingContext` that records draw commands
//!
//! # Example
//!
//! ```ignore
//! use flick_paint::{ContextType, RecordingContext, Size, SurfaceTable};
//!
//! let mut table = SurfaceTable::<RecordingContext>::new();
//! let surface = table.create(Some("stage"), Size::new(300.0, 150.0))?;
//!
//! let mut surface = surface.borrow_mut();
//! surface.get_context(ContextType::TwoD);
//! surface.clear();
//! ```

pub mod color;
pub mod context;
pub mod error;
pub mod geometry;
pub mod surface;

pub use color::{Background, Color};
pub use context::{ContextType, DrawCommand, RecordingContext, RenderingContext};
pub use error::{PaintError, Result};
pub use geometry::{Point, Rect, Size};
pub use surface::{SharedSurface, Surface, SurfaceId, SurfaceInfo, SurfaceTable};
