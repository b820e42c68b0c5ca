use thiserror::Error;

use super::{Dataset, SourceFormat, delimited, spreadsheet};
use crate::planner::FileUpload;

/// Reasons a parse attempt is rejected. Every error discards the whole attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file extension is not one of `csv`, `xlsx` or `xls`.
    #[error("Unsupported file format for {file_name}; expected .csv, .xlsx or .xls")]
    UnsupportedFormat { file_name: String },
    /// A row (or the workbook container) could not be decoded.
    #[error("Malformed row: {0}")]
    MalformedRow(String),
    /// The file has no data rows below its header.
    #[error("Dataset contains no data rows")]
    EmptyDataset,
}

/// Parse an uploaded file into a dataset.
pub fn parse_upload(upload: &FileUpload) -> Result<Dataset, ParseError> {
    parse_bytes(&upload.name, &upload.bytes)
}

/// Parse raw file bytes, choosing the decoder from `file_name`'s extension.
pub fn parse_bytes(file_name: &str, bytes: &[u8]) -> Result<Dataset, ParseError> {
    let format =
        SourceFormat::from_file_name(file_name).ok_or_else(|| ParseError::UnsupportedFormat {
            file_name: file_name.to_string(),
        })?;
    let dataset = if format.is_spreadsheet() {
        spreadsheet::parse_first_sheet(bytes)?
    } else {
        delimited::parse_delimited(bytes)?
    };
    tracing::debug!(
        "Parsed {file_name} as {format}: {} columns, {} rows",
        dataset.columns().len(),
        dataset.row_count()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_fails_before_reading() {
        let err = parse_bytes("readings.txt", b"a,b\n1,2\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnsupportedFormat {
                file_name: "readings.txt".into()
            }
        );
    }

    #[test]
    fn dispatches_csv_by_extension() {
        let dataset = parse_bytes("Readings.CSV", b"t,v\n1,2\n").unwrap();
        assert_eq!(dataset.columns(), ["t", "v"]);
        assert_eq!(dataset.row_count(), 1);
    }

    #[test]
    fn garbage_workbook_is_malformed() {
        let err = parse_bytes("book.xlsx", b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow(_)), "{err:?}");
    }
}
