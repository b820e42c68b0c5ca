use std::fmt;
use std::path::Path;

/// File formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma-delimited text with a header row.
    Csv,
    /// Office Open XML workbook.
    Xlsx,
    /// Legacy binary Excel workbook.
    Xls,
}

impl SourceFormat {
    /// Extensions accepted by the upload picker, without the leading dot.
    pub const EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Resolve the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, Self::Xlsx | Self::Xls)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_extensions() {
        assert_eq!(SourceFormat::from_file_name("dbp.csv"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_file_name("DBP.XLSX"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_file_name("old.data.xls"), Some(SourceFormat::Xls));
    }

    #[test]
    fn rejects_other_names() {
        assert_eq!(SourceFormat::from_file_name("notes.txt"), None);
        assert_eq!(SourceFormat::from_file_name("readings.json"), None);
        assert_eq!(SourceFormat::from_file_name("csv"), None);
        assert_eq!(SourceFormat::from_file_name(""), None);
    }
}
