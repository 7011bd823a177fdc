//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// A frame loop cannot run at this rate
    #[error("Invalid frame rate: {0} fps")]
    InvalidFrameRate(u32),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
