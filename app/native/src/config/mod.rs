//! Configuration module for Gridtile.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//!
//! Configuration is loaded once by the binary and passed down explicitly;
//! nothing here is global.

pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ConfigError, GridtileConfig, InputConfig, PersistenceConfig, ViewportConfig,
    WindowHelperConfig, config_paths, load_config as load_config_default, load_config_from_path,
};

/// Loads the configuration, falling back to defaults.
///
/// A custom path, when given, replaces the search paths. A missing file
/// yields the defaults silently; an unreadable or malformed file yields the
/// defaults with a warning.
///
/// Returns the configuration and the path it was read from, if any.
#[must_use]
pub fn load_or_default(custom_path: Option<&Path>) -> (GridtileConfig, Option<PathBuf>) {
    let result = custom_path.map_or_else(load_config_default, |path| {
        load_config_from_path(path).map(|config| (config, path.to_path_buf()))
    });

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            (config, Some(path))
        }
        Err(ConfigError::NotFound) => {
            if let Some(path) = custom_path {
                tracing::warn!(path = %path.display(), "configuration file not found, using defaults");
            } else {
                tracing::debug!("no configuration file found, using defaults");
            }
            (GridtileConfig::default(), None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            (GridtileConfig::default(), None)
        }
    }
}
