//! Error types for trellis_app

use thiserror::Error;
use trellis_layout::UiError;
use trellis_platform::PlatformError;

/// Errors that can occur in a Trellis application
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Reconciliation or layout failed
    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    /// Platform error (window creation, native controls)
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A window with this id is already open
    #[error("Window {0:?} already exists")]
    DuplicateWindow(String),

    /// No open window has this id
    #[error("No window {0:?}")]
    UnknownWindow(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(format!("{err:#}"))
    }
}

/// Result type for trellis_app operations
pub type Result<T> = std::result::Result<T, AppError>;
