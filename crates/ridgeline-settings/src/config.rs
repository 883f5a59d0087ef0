//! Engine configuration.
//!
//! Three sections: display switches for the renderer, thresholds for the
//! creation handlers, and the external tool. Every field has a default, so
//! partial files load.

use ridgeline_core::WorkingMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SettingsError};

pub const CONFIG_DIR_NAME: &str = "ridgeline";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Draw marking labels
    pub show_labels: bool,
    /// Number of flashes when a marking is highlighted from the table
    pub blink_flashes: u32,
    /// Half-period of a flash in milliseconds
    pub blink_period_ms: u64,
    /// Layer opacity while labels are hidden
    pub unlabeled_alpha: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            blink_flashes: 3,
            blink_period_ms: 150,
            unlabeled_alpha: 0.5,
        }
    }
}

/// Marking creation settings, in image pixels unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkingSettings {
    pub min_shape_px: f64,
    pub min_measurement_px: f64,
    pub polygon_close_px: f64,
    /// Selection hit radius in screen pixels
    pub hit_tolerance_px: f64,
    pub working_mode: WorkingMode,
}

impl Default for MarkingSettings {
    fn default() -> Self {
        Self {
            min_shape_px: 1.0,
            min_measurement_px: 0.5,
            polygon_close_px: 6.0,
            hit_tolerance_px: 8.0,
            working_mode: WorkingMode::Fingerprint,
        }
    }
}

/// External tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// SourceAFIS CLI executable; auto-marking is unavailable without it
    pub sourceafis_path: Option<PathBuf>,
    pub timeout_ms: u64,
    /// Directory for tool outputs, the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            sourceafis_path: None,
            timeout_ms: 30_000,
            temp_dir: None,
        }
    }
}

impl ToolSettings {
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySettings,
    pub marking: MarkingSettings,
    pub tools: ToolSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (expected .json or .toml)",
            path.display()
        ))),
    }
}

/// `<config dir>/ridgeline/config.toml`, falling back to the home directory.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| SettingsError::ConfigDirectory("no config or home directory".into()))?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML by extension)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML by extension), creating the parent
    /// directory
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        if display.blink_period_ms == 0 {
            return Err(SettingsError::invalid("display.blink_period_ms", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&display.unlabeled_alpha) {
            return Err(SettingsError::invalid(
                "display.unlabeled_alpha",
                "must be between 0 and 1",
            ));
        }

        let marking = &self.marking;
        let thresholds = [
            ("marking.min_shape_px", marking.min_shape_px),
            ("marking.min_measurement_px", marking.min_measurement_px),
            ("marking.polygon_close_px", marking.polygon_close_px),
            ("marking.hit_tolerance_px", marking.hit_tolerance_px),
        ];
        for (key, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::invalid(key, "must be a non-negative number"));
            }
        }

        if self.tools.timeout_ms == 0 {
            return Err(SettingsError::invalid("tools.timeout_ms", "must be > 0"));
        }
        Ok(())
    }
}
