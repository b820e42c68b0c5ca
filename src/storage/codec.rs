//! JSON layout of the saved session.
//!
//! The record carries the session fields (`fileName`, `fileSize`, `rows`,
//! `columns`, `columnRoles`, `splitPlan`) at the top level next to
//! `formatVersion` and a BLAKE3 `checksum` of the session fields' canonical
//! encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::SessionConfiguration;

/// Current snapshot layout version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Why a stored snapshot was rejected.
#[derive(Debug, Error)]
pub enum SnapshotDecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported format version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredSessionRef<'a> {
    format_version: u32,
    checksum: String,
    #[serde(flatten)]
    session: &'a SessionConfiguration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    format_version: u32,
    checksum: String,
    #[serde(flatten)]
    session: SessionConfiguration,
}

/// Encode a session into its stored JSON form.
pub fn encode_snapshot(session: &SessionConfiguration) -> Result<Vec<u8>, serde_json::Error> {
    let stored = StoredSessionRef {
        format_version: SNAPSHOT_FORMAT_VERSION,
        checksum: checksum(session)?,
        session,
    };
    serde_json::to_vec(&stored)
}

/// Decode and verify a stored snapshot.
pub fn decode_snapshot(bytes: &[u8]) -> Result<SessionConfiguration, SnapshotDecodeError> {
    let stored: StoredSession = serde_json::from_slice(bytes)?;
    if stored.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotDecodeError::UnsupportedVersion {
            found: stored.format_version,
        });
    }
    if checksum(&stored.session)? != stored.checksum {
        return Err(SnapshotDecodeError::ChecksumMismatch);
    }
    Ok(stored.session)
}

fn checksum(session: &SessionConfiguration) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(session)?;
    Ok(blake3::hash(&canonical).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_bytes;
    use crate::planner::{ColumnRoles, SplitPlan, SplitPreset};

    fn sample_session() -> SessionConfiguration {
        let dataset = parse_bytes(
            "dbp.csv",
            b"timestamp,dbp,temp,status\n2024-01-15,21.25,20.1,Normal\n2024-02-15,,0.1,\n2024-03-15,30,19.999999999999996,High\n",
        )
        .unwrap();
        SessionConfiguration {
            file_name: "dbp.csv".into(),
            file_size: 120,
            column_roles: ColumnRoles::with_defaults(dataset.columns()),
            split_plan: SplitPlan::from_preset(dataset.row_count(), SplitPreset::SixTwoTwo),
            dataset,
        }
    }

    #[test]
    fn round_trips_field_for_field() {
        let session = sample_session();
        let bytes = encode_snapshot(&session).unwrap();
        assert_eq!(decode_snapshot(&bytes).unwrap(), session);
    }

    #[test]
    fn uses_flat_camel_case_layout() {
        let bytes = encode_snapshot(&sample_session()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "formatVersion",
            "checksum",
            "fileName",
            "fileSize",
            "rows",
            "columns",
            "columnRoles",
            "splitPlan",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 8);
        assert_eq!(value["columns"][0], "timestamp");
        assert_eq!(value["rows"][1]["dbp"], serde_json::Value::Null);
        assert_eq!(value["columnRoles"]["timestamp"], "reference");
        assert_eq!(value["splitPlan"]["testEnd"], 3);
    }

    #[test]
    fn tampered_payload_fails_checksum() {
        let bytes = encode_snapshot(&sample_session()).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["fileName"] = "other.csv".into();
        let tampered = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            decode_snapshot(&tampered),
            Err(SnapshotDecodeError::ChecksumMismatch)
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let bytes = encode_snapshot(&sample_session()).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["formatVersion"] = 7.into();
        let bumped = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            decode_snapshot(&bumped),
            Err(SnapshotDecodeError::UnsupportedVersion { found: 7 })
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            decode_snapshot(b"{not json"),
            Err(SnapshotDecodeError::Json(_))
        ));
    }
}
