//! Error types for flick_animation

use std::fmt;

use flick_paint::{ContextType, PaintError};
use thiserror::Error;

/// The kinds of value accepted by the positional construction adapter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentKind {
    ContextType,
    Config,
    Callback,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgumentKind::ContextType => "context type",
            ArgumentKind::Config => "configuration",
            ArgumentKind::Callback => "frame callback",
        })
    }
}

/// Errors raised while constructing an animation controller
///
/// Steady-state operation never fails: missing callbacks, reached limits and
/// invalid option values are handled by state transitions and logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The surface reference does not resolve to a known surface
    #[error("Invalid surface provided: {0}")]
    SurfaceNotFound(String),

    /// A surface collection was given but it holds no surface
    #[error("Invalid surface provided: empty surface collection")]
    EmptySurfaceCollection,

    /// Two positional arguments of the same kind
    #[error("Invalid arguments: two values of kind {0}")]
    DuplicateArgument(ArgumentKind),

    /// The surface cannot provide the requested rendering context
    #[error("Surface cannot provide a {0} rendering context")]
    ContextUnavailable(ContextType),

    /// Error from the paint layer
    #[error(transparent)]
    Paint(#[from] PaintError),
}

/// Result type for flick_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
