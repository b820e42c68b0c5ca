use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;

use crate::app_dirs;

use super::super::config_types::{ConfigError, WorkbenchSettings};
use super::CONFIG_FILE_NAME;
use super::map_app_dir_error;

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if missing.
pub fn load_or_default() -> Result<WorkbenchSettings, ConfigError> {
    let path = config_path()?;
    load_settings_from(&path)
}

pub(super) fn load_settings_from(path: &Path) -> Result<WorkbenchSettings, ConfigError> {
    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Ok(WorkbenchSettings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str::<WorkbenchSettings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(WorkbenchSettings::normalized)
}
