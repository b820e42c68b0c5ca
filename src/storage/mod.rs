//! Session snapshot persistence behind the [`SessionStore`] port.
//!
//! The planner never touches the file system directly: production code uses
//! [`FileSessionStore`], tests and embedders can use [`MemorySessionStore`].

use std::path::PathBuf;

use thiserror::Error;

use crate::planner::SessionConfiguration;

mod codec;
mod file_store;
mod memory;

pub use codec::{SNAPSHOT_FORMAT_VERSION, SnapshotDecodeError, decode_snapshot, encode_snapshot};
pub use file_store::{FileSessionStore, SESSION_FILE_NAME};
pub use memory::MemorySessionStore;

/// Storage port for the single saved session.
pub trait SessionStore {
    /// Read the saved session, `Ok(None)` when nothing was saved.
    fn load(&self) -> Result<Option<SessionConfiguration>, StoreError>;
    /// Replace the saved session.
    fn save(&mut self, session: &SessionConfiguration) -> Result<(), StoreError>;
    /// Forget the saved session. Clearing an empty store succeeds.
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn load(&self) -> Result<Option<SessionConfiguration>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, session: &SessionConfiguration) -> Result<(), StoreError> {
        (**self).save(session)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Errors raised by session stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No application directory could be resolved.
    #[error("No suitable directory available for the session snapshot")]
    NoStoreDir,
    /// Failed to create the directory holding the snapshot.
    #[error("Unable to create session directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read the snapshot.
    #[error("Failed to read session snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the snapshot.
    #[error("Failed to write session snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to delete the snapshot.
    #[error("Failed to remove session snapshot {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The snapshot exists but is corrupt, tampered with or from another version.
    #[error("Unreadable session snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        source: SnapshotDecodeError,
    },
    /// The session could not be encoded.
    #[error("Failed to encode session snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// True for snapshots that exist but cannot be used; callers treat these as a cold start.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
