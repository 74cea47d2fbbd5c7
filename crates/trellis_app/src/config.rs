//! Application configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a
//! valid configuration:
//!
//! ```toml
//! [debug]
//! layout = true
//! highlight_ms = 100
//!
//! [log]
//! filter = "trellis=debug"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::Result;

/// Top-level application configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debug: DebugConfig,
    pub log: LogConfig,
}

/// Layout debugging options
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Outline every layouter and highlight the ones a layout touched
    pub layout: bool,
    /// How long a highlight stays before it is cancelled, in milliseconds
    pub highlight_ms: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            layout: false,
            highlight_ms: 100,
        }
    }
}

impl DebugConfig {
    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

/// Logging options
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Enable the layout debug overlay
    pub fn debug_layout(mut self, enabled: bool) -> Self {
        self.debug.layout = enabled;
        self
    }
}
