//! Excel workbook decoding (first sheet only).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::{CellValue, Dataset, ParseError, build_row, unique_column_names};

/// Decode the first worksheet of an `xlsx`/`xls` workbook.
///
/// The first non-blank row supplies the column names and fully blank rows
/// are skipped. String cells are typed like CSV fields.
pub(super) fn parse_first_sheet(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| ParseError::MalformedRow(format!("unreadable workbook: {err}")))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(err)) => {
            return Err(ParseError::MalformedRow(format!(
                "unreadable first sheet: {err}"
            )));
        }
        None => return Err(ParseError::EmptyDataset),
    };

    let mut sheet_rows = range
        .rows()
        .filter(|cells| !cells.iter().all(|cell| cell_value(cell).is_empty()));
    let Some(header) = sheet_rows.next() else {
        return Err(ParseError::EmptyDataset);
    };
    let columns = unique_column_names(header.iter().map(header_text));
    let rows: Vec<_> = sheet_rows
        .map(|cells| build_row(&columns, cells.iter().map(cell_value)))
        .collect();
    if rows.is_empty() {
        return Err(ParseError::EmptyDataset);
    }
    Ok(Dataset::new(columns, rows))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) if value.is_finite() => CellValue::Number(*value),
        Data::Float(value) => CellValue::Text(value.to_string()),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::String(text) => CellValue::from_field(text),
        Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(text.trim().to_string())
        }
        Data::Bool(flag) => CellValue::Text(flag.to_string()),
        Data::Error(err) => CellValue::Text(format!("#{err:?}")),
    }
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        other => other.to_string(),
    }
}
