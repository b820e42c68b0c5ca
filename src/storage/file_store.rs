use std::path::{Path, PathBuf};

use super::{SessionStore, StoreError, codec};
use crate::app_dirs;
use crate::atomic_file::write_atomic;
use crate::planner::SessionConfiguration;

/// Filename of the saved session inside the application directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Keeps the session snapshot in a single JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at `<app dir>/session.json`.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = app_dirs::app_root_dir().map_err(|err| match err {
            app_dirs::AppDirError::NoBaseDir => StoreError::NoStoreDir,
            app_dirs::AppDirError::CreateDir { path, source } => {
                StoreError::CreateDir { path, source }
            }
        })?;
        Ok(Self::at_path(dir.join(SESSION_FILE_NAME)))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionConfiguration>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        codec::decode_snapshot(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&mut self, session: &SessionConfiguration) -> Result<(), StoreError> {
        let data = codec::encode_snapshot(session).map_err(StoreError::Encode)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomic(&self.path, &data).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Saved session snapshot ({} bytes) to {}", data.len(), self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::{APP_DIR_NAME, ConfigBaseGuard};
    use crate::dataset::parse_bytes;
    use crate::planner::{ColumnRoles, SplitPlan, SplitPreset};
    use tempfile::tempdir;

    fn session() -> SessionConfiguration {
        let dataset = parse_bytes("ph.csv", b"t,ph\n1,7.1\n2,7.3\n3,6.9\n4,7.0\n5,7.2\n").unwrap();
        SessionConfiguration {
            file_name: "ph.csv".into(),
            file_size: 36,
            column_roles: ColumnRoles::with_defaults(dataset.columns()),
            split_plan: SplitPlan::from_preset(dataset.row_count(), SplitPreset::SixTwoTwo),
            dataset,
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::at_path(dir.path().join(SESSION_FILE_NAME));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = FileSessionStore::at_path(dir.path().join("nested").join(SESSION_FILE_NAME));
        let saved = session();
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), Some(saved));
    }

    #[test]
    fn corrupt_file_is_a_decode_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        std::fs::write(&path, b"{\"fileName\": 3").unwrap();
        let err = FileSessionStore::at_path(&path).load().unwrap_err();
        assert!(err.is_decode_failure(), "{err}");
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = FileSessionStore::at_path(dir.path().join(SESSION_FILE_NAME));
        store.save(&session()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn default_location_is_app_root() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let store = FileSessionStore::open_default().unwrap();
        assert_eq!(
            store.path(),
            dir.path().join(APP_DIR_NAME).join(SESSION_FILE_NAME)
        );
    }
}
