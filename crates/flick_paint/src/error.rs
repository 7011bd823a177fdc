//! Paint error types

use thiserror::Error;

/// Errors raised while parsing paint values or managing surfaces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// The string is not a recognized color
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// The string is not a recognized rendering context type
    #[error("Invalid context type: {0:?}")]
    InvalidContextType(String),

    /// A surface with this name already exists in the table
    #[error("Surface name already in use: {0}")]
    DuplicateSurfaceName(String),
}

/// Result type for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;
