use std::path::Path;

use super::super::config_types::{ConfigError, WorkbenchSettings};
use super::load::config_path;
use crate::atomic_file::write_atomic;

/// Persist settings to disk, overwriting any previous contents.
pub fn save(settings: &WorkbenchSettings) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(settings, &path)
}

/// Save settings to a specific path, creating parent directories as needed.
///
/// The TOML file is replaced atomically so a crash never leaves a partial write.
pub fn save_to_path(settings: &WorkbenchSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
