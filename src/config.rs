//! Configuration management for md2poster
//!
//! Handles loading, saving, and managing user settings. Configuration is
//! stored as JSON in the platform configuration directory.

use crate::error::{ConfigError, ConfigResult, FileError};
use crate::file_handler::{ensure_dir_sync, read_file_sync, write_file_atomic_sync, DEFAULT_DEBOUNCE_MS};
use crate::markdown::{RenderMode, DEFAULT_FILE_STEM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
pub const APP_ID: &str = "md2poster";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Rendering defaults
    pub render: RenderConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Watch mode settings
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from the default location, or return defaults
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        match read_file_sync(path) {
            Ok(read) => {
                let config = serde_json::from_str(&read.content)?;
                log::debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(FileError::NotFound(_)) => {
                log::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadError(e)),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(Self::config_path()?)
    }

    /// Save configuration to `path`, creating its directory if needed
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir_sync(parent).map_err(ConfigError::SaveError)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        write_file_atomic_sync(path, &json).map_err(ConfigError::SaveError)
    }

    /// Fold command line choices into this configuration
    ///
    /// `None` leaves the stored value untouched.
    pub fn remember(
        &mut self,
        mode: Option<RenderMode>,
        dark_mode: bool,
        output_dir: Option<PathBuf>,
        file_stem: Option<String>,
    ) {
        if let Some(mode) = mode {
            self.render.default_mode = mode;
        }
        self.render.dark_mode |= dark_mode;
        if output_dir.is_some() {
            self.export.output_dir = output_dir;
        }
        if let Some(stem) = file_stem {
            self.export.file_stem = stem;
        }
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }
}

/// Rendering defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Pagination mode used when none is given
    pub default_mode: RenderMode,

    /// Dark card styling
    pub dark_mode: bool,
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory (defaults to the source file's directory)
    pub output_dir: Option<PathBuf>,

    /// Output file stem
    pub file_stem: String,

    /// Embed the stylesheet in each card
    pub include_styles: bool,

    /// Show the page badge on paginated cards
    pub show_page_badge: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_stem: DEFAULT_FILE_STEM.to_string(),
            include_styles: true,
            show_page_badge: true,
        }
    }
}

/// Watch mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before re-rendering, in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}
