use std::path::PathBuf;

use super::{SessionStore, StoreError, codec};
use crate::planner::SessionConfiguration;

const MEMORY_LOCATION: &str = ":memory:";

/// In-process store holding the encoded snapshot.
///
/// Goes through the same encoding as [`FileSessionStore`](super::FileSessionStore),
/// and can be told to reject writes to exercise the non-fatal failure path.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    snapshot: Option<Vec<u8>>,
    reject_writes: bool,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-encoded (possibly corrupt) snapshot bytes.
    pub fn with_raw_snapshot(bytes: Vec<u8>) -> Self {
        Self {
            snapshot: Some(bytes),
            ..Self::default()
        }
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn raw_snapshot(&self) -> Option<&[u8]> {
        self.snapshot.as_deref()
    }

    /// Successful saves so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionConfiguration>, StoreError> {
        let Some(bytes) = &self.snapshot else {
            return Ok(None);
        };
        codec::decode_snapshot(bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                path: PathBuf::from(MEMORY_LOCATION),
                source,
            })
    }

    fn save(&mut self, session: &SessionConfiguration) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Write {
                path: PathBuf::from(MEMORY_LOCATION),
                source: std::io::Error::other("storage quota exceeded"),
            });
        }
        self.snapshot = Some(codec::encode_snapshot(session).map_err(StoreError::Encode)?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.snapshot = None;
        Ok(())
    }
}
