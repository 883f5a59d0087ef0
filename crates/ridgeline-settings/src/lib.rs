//! Ridgeline Settings Crate
//!
//! Engine configuration and its persistence as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, Config, DisplaySettings, MarkingSettings, ToolSettings,
};
pub use error::{Result, SettingsError};
