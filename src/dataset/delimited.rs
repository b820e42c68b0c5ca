//! Comma-delimited text decoding.

use super::{CellValue, Dataset, ParseError, build_row, unique_column_names};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV bytes with a mandatory header row.
///
/// Records are streamed one at a time; the first bad record aborts the parse
/// and nothing decoded so far is kept. Empty lines are skipped by the reader.
pub(super) fn parse_delimited(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|err| ParseError::MalformedRow(format!("header row: {err}")))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(ParseError::EmptyDataset);
    }
    let columns = unique_column_names(headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| ParseError::MalformedRow(err.to_string()))?;
        rows.push(build_row(&columns, record.iter().map(CellValue::from_field)));
    }
    if rows.is_empty() {
        return Err(ParseError::EmptyDataset);
    }
    Ok(Dataset::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows_in_order() {
        let data = b"timestamp,dbp,temp\n2024-01-15,21.5,20\n2024-02-15,,22.1\n2024-03-15,30,x\n";
        let dataset = parse_delimited(data).unwrap();
        assert_eq!(dataset.columns(), ["timestamp", "dbp", "temp"]);
        assert_eq!(dataset.row_count(), 3);
        let rows = dataset.rows();
        assert_eq!(rows[0]["timestamp"], CellValue::Text("2024-01-15".into()));
        assert_eq!(rows[0]["dbp"], CellValue::Number(21.5));
        assert_eq!(rows[1]["dbp"], CellValue::Empty);
        assert_eq!(rows[2]["temp"], CellValue::Text("x".into()));
    }

    #[test]
    fn skips_blank_lines() {
        let dataset = parse_delimited(b"a,b\n1,2\n\n\n3,4\n\n").unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows()[1]["a"], CellValue::Number(3.0));
    }

    #[test]
    fn strips_byte_order_mark() {
        let dataset = parse_delimited(b"\xEF\xBB\xBFtime,value\n1,2\n").unwrap();
        assert_eq!(dataset.columns(), ["time", "value"]);
    }

    #[test]
    fn header_only_is_empty_dataset() {
        assert_eq!(parse_delimited(b"a,b,c\n"), Err(ParseError::EmptyDataset));
        assert_eq!(parse_delimited(b""), Err(ParseError::EmptyDataset));
    }

    #[test]
    fn uneven_record_aborts_whole_parse() {
        let err = parse_delimited(b"a,b\n1,2\n3\n4,5\n").unwrap_err();
        let ParseError::MalformedRow(message) = err else {
            panic!("expected malformed row, got {err:?}");
        };
        assert!(message.contains("field"), "{message}");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = parse_delimited(b"a,b\n1,\xFF\xFE\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow(_)));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let dataset = parse_delimited(b"site,level\n\"Plant A, north\",3\n").unwrap();
        assert_eq!(
            dataset.rows()[0]["site"],
            CellValue::Text("Plant A, north".into())
        );
    }
}
