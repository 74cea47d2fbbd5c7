//! Platform error types

use thiserror::Error;

use crate::backend::NativeHandle;

/// Errors reported by a native backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Failed to create a native control
    #[error("Failed to create control: {0}")]
    ControlCreation(String),

    /// The handle does not name a live control
    #[error("Unknown control handle: {0:?}")]
    UnknownControl(NativeHandle),

    /// Failed to move or resize a control
    #[error("Failed to set control geometry: {0}")]
    Geometry(String),

    /// Failed to measure control content
    #[error("Failed to measure control: {0}")]
    Measure(String),

    /// Failed to create window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Platform not available
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
