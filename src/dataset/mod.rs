//! Tabular datasets parsed from uploaded CSV and spreadsheet files.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod delimited;
mod format;
mod parse;
mod spreadsheet;

pub use format::SourceFormat;
pub use parse::{ParseError, parse_bytes, parse_upload};

/// One dataset row keyed by column name.
pub type Row = BTreeMap<String, CellValue>;

/// Raw cell value as read from the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Classify a delimited-text field: blank is empty, finite numbers are numeric.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Number(value),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

/// Ordered columns plus ordered rows. Rows are shared so snapshots stay cheap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Arc<Vec<Row>>,
    columns: Vec<String>,
}

impl Dataset {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
            columns,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Shared handle to the row storage.
    pub fn shared_rows(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Iterate one column top to bottom; rows missing the key yield `Empty`.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows.iter().map(move |row| row.get(column).unwrap_or(EMPTY))
    }
}

/// Turn raw header cells into unique, non-blank column names.
///
/// Blank headers become `column_<n>` (1-based position); repeats get `_1`, `_2`, ...
pub(crate) fn unique_column_names<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for (idx, raw) in headers.into_iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        columns.push(name);
    }
    columns
}

pub(crate) fn build_row<I>(columns: &[String], cells: I) -> Row
where
    I: IntoIterator<Item = CellValue>,
{
    columns.iter().cloned().zip(cells).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fields() {
        assert_eq!(CellValue::from_field(""), CellValue::Empty);
        assert_eq!(CellValue::from_field("   "), CellValue::Empty);
        assert_eq!(CellValue::from_field("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::from_field(" -1.5e2 "), CellValue::Number(-150.0));
        assert_eq!(
            CellValue::from_field("2024-01-15 14:30:00"),
            CellValue::Text("2024-01-15 14:30:00".into())
        );
        assert_eq!(CellValue::from_field("NaN"), CellValue::Text("NaN".into()));
        assert_eq!(CellValue::from_field("inf"), CellValue::Text("inf".into()));
    }

    #[test]
    fn deduplicates_and_fills_headers() {
        let names = unique_column_names(
            ["time", "value", "value", " ", "value_1"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(
            names,
            vec!["time", "value", "value_1", "column_4", "value_1_1"]
        );
    }

    #[test]
    fn cell_values_serialize_as_plain_json() {
        let row = build_row(
            &["a".to_string(), "b".to_string(), "c".to_string()],
            [
                CellValue::Number(1.5),
                CellValue::Text("x".into()),
                CellValue::Empty,
            ],
        );
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"a":1.5,"b":"x","c":null}"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn column_values_follow_row_order() {
        let columns = vec!["t".to_string(), "v".to_string()];
        let rows = (0..3)
            .map(|i| build_row(&columns, [CellValue::Number(i as f64), CellValue::Empty]))
            .collect();
        let dataset = Dataset::new(columns, rows);
        let values: Vec<_> = dataset.column_values("t").filter_map(CellValue::as_f64).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
        assert_eq!(dataset.column_values("missing").count(), 3);
        assert!(dataset.has_column("v"));
        assert!(!dataset.has_column("x"));
    }
}
