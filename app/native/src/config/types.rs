//! Configuration types and loading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Every section is optional; missing values fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    APP_NAME, DEFAULT_DEADZONE, DEFAULT_REPEAT_INTERVAL_MS, DEFAULT_STORAGE_NAMESPACE,
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};
use crate::modules::input::GamepadSettings;
use crate::modules::layout::{Blueprint, Viewport, builtin_blueprints};
use crate::modules::persistence::FileStore;

/// Gamepad stick tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
    /// Stick magnitude (0.0 to 1.0) that must be exceeded before a stick
    /// produces commands. Default: 0.3
    pub deadzone: f64,

    /// Milliseconds between repeated commands while a stick is held.
    /// Default: 220
    pub repeat_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
        }
    }
}

impl InputConfig {
    /// Translator settings, with the deadzone clamped to `[0.0, 0.95]`.
    #[must_use]
    pub fn gamepad_settings(&self) -> GamepadSettings {
        let deadzone = if self.deadzone.is_finite() {
            self.deadzone.clamp(0.0, 0.95)
        } else {
            DEFAULT_DEADZONE
        };

        GamepadSettings {
            deadzone,
            repeat_interval: Duration::from_millis(self.repeat_interval_ms),
        }
    }
}

/// Where saved layouts are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistenceConfig {
    /// Prefix for storage keys. Default: "gridtile"
    pub namespace: String,

    /// Path to the layouts file. `~/` is expanded.
    /// Default: `<data dir>/gridtile/layouts.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            path: None,
        }
    }
}

impl PersistenceConfig {
    /// Resolved path of the layouts file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.path.as_deref().map_or_else(FileStore::default_path, expand_home)
    }
}

/// Pixel size of the area tiles map onto when applied to windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Width in pixels. Default: 1920
    pub width: f64,
    /// Height in pixels. Default: 1080
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ViewportConfig {
    #[must_use]
    pub const fn viewport(&self) -> Viewport { Viewport::new(self.width, self.height) }
}

/// External program that moves the frontmost window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowHelperConfig {
    /// Program invoked as `<program> set-frame <x> <y> <w> <h>`.
    /// When unset, applying a tile to a window is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

/// Root configuration structure for Gridtile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GridtileConfig {
    /// Blueprints to cycle through. When empty, the built-in blueprints are used.
    pub blueprints: Vec<Blueprint>,

    /// Gamepad tuning.
    pub input: InputConfig,

    /// Saved layout storage.
    pub persistence: PersistenceConfig,

    /// Viewport used to convert tiles to pixels.
    pub viewport: ViewportConfig,

    /// Window helper program.
    pub window_helper: WindowHelperConfig,
}

impl GridtileConfig {
    /// Blueprints to use for a session.
    ///
    /// Configured blueprints that fail validation are skipped with a warning.
    /// Falls back to the built-in blueprints when none remain.
    #[must_use]
    pub fn catalog(&self) -> Vec<Blueprint> {
        let valid: Vec<Blueprint> = self
            .blueprints
            .iter()
            .filter(|blueprint| match blueprint.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(blueprint = %blueprint.id, error = %err, "skipping invalid blueprint");
                    false
                }
            })
            .cloned()
            .collect();

        if valid.is_empty() {
            if !self.blueprints.is_empty() {
                tracing::warn!("no valid configured blueprints, using built-in blueprints");
            }
            return builtin_blueprints();
        }

        valid
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/gridtile/config.jsonc, \
         <config dir>/gridtile/config.jsonc, or ~/.gridtile.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".gridtile.jsonc", ".gridtile.json"];

/// Returns the configuration file search paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/gridtile/config.{jsonc,json}`
/// 2. `~/.config/gridtile/config.{jsonc,json}`
/// 3. `<platform config dir>/gridtile/config.{jsonc,json}`
/// 4. `~/.gridtile.{jsonc,json}`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first existing file in [`config_paths`].
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no file exists, or a read/parse error
/// for the first file found.
pub fn load_config() -> Result<(GridtileConfig, PathBuf), ConfigError> {
    let path = config_paths().into_iter().find(|p| p.exists()).ok_or(ConfigError::NotFound)?;
    let config = load_config_from_path(&path)?;
    Ok((config, path))
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_from_path(path: &Path) -> Result<GridtileConfig, ConfigError> {
    let file = fs::File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound,
        _ => ConfigError::Io { path: path.to_path_buf(), source },
    })?;

    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    serde_json::from_reader(reader)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path.trim());
    PathBuf::from(expanded.as_ref())
}
