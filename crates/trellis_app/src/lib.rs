//! Trellis Application Framework
//!
//! Ties the engine to a platform: loads [`AppConfig`], installs logging,
//! opens windows and drives their element trees from the host event loop.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Instant;
//! use trellis_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = AppConfig::load("trellis.toml")?;
//!     trellis_app::logging::init(&config.log);
//!
//!     let mut app = App::new(config, platform);
//!     let window = app.create_window(
//!         WindowConfig::new("Hello").size(400, 300),
//!         Rc::new(Center::new().child(Label::new("Hello Trellis!"))),
//!     )?;
//!
//!     loop {
//!         // dispatch native events, then:
//!         app.pump(Instant::now())?;
//!     }
//! }
//! ```

mod app;
pub mod config;
mod error;
pub mod logging;

pub use app::App;
pub use config::{AppConfig, DebugConfig, LogConfig};
pub use error::{AppError, Result};

// Re-export platform types for applications
pub use trellis_platform::{Platform, WindowConfig};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::AppConfig;
    pub use crate::error::{AppError, Result};

    // Widgets and engine
    pub use trellis_widgets::prelude::*;

    // Core types
    pub use trellis_core::{Constraints, Point, Rect, Size};
    pub use trellis_platform::{Platform, WindowConfig};
}
