use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ColumnRoles, SplitPlan};
use crate::dataset::Dataset;

/// A file handed over by the file-selection collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    /// Size reported by the picker, in bytes.
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, size: u64, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size,
            bytes,
        }
    }

    /// Build an upload whose reported size is the byte length.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, size, bytes)
    }

    /// Size in KiB as shown next to the file name.
    pub fn size_kib(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// The unit of persistence: the confirmed dataset plus its roles and split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfiguration {
    pub file_name: String,
    pub file_size: u64,
    #[serde(flatten)]
    pub dataset: Dataset,
    pub column_roles: ColumnRoles,
    pub split_plan: SplitPlan,
}

impl SessionConfiguration {
    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    /// Validity of the split plan against this session's row count.
    pub fn is_valid(&self) -> bool {
        self.split_plan.is_valid_for(self.dataset.row_count())
    }
}
