//! Row parser for uploaded delimited files.
//!
//! Decodes an upload as UTF-8 comma-separated text with a header line and
//! produces one field map per data row. Pure transform: validation of
//! field contents happens later, in the coercion layer.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ParseError, ParseResult};

/// Column delimiter. The import schema is fixed, so no delimiter
/// auto-detection takes place.
const DELIMITER: char = ',';

/// One data row: the raw field values keyed by column name, plus the
/// 1-based source line number (the header is line 1).
#[derive(Debug, Clone)]
pub struct Row {
    pub line: usize,
    fields: HashMap<String, String>,
}

impl Row {
    /// Raw value of a column. `None` when the column is absent from the
    /// header; rows shorter than the header are padded with empty strings,
    /// so a named column always yields `Some`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Parsed upload: the header names in file order and the data rows.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Parse uploaded bytes into rows.
///
/// Fails with [`ParseError::MalformedInput`] when the bytes are not valid
/// UTF-8, before any row is produced.
///
/// # Example
/// ```ignore
/// use boxoffice::parser::parse_rows;
///
/// let csv = "name,role\nAlice,Lady Macbeth\nBob,Banquo";
/// let rows = parse_rows(csv.as_bytes()).unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows.rows[0].get("name"), Some("Alice"));
/// ```
pub fn parse_rows(bytes: &[u8]) -> ParseResult<RowSet> {
    let content =
        std::str::from_utf8(bytes).map_err(|e| ParseError::MalformedInput(e.to_string()))?;
    parse_text(content)
}

/// Parse a file from disk (CLI entry point).
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<RowSet> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_rows(&bytes)
}

fn parse_text(content: &str) -> ParseResult<RowSet> {
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(ParseError::EmptyFile)?;

    let headers: Vec<String> = header_line
        .split(DELIMITER)
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::NoHeaders);
    }

    let mut rows = Vec::new();

    for (idx, line) in lines.enumerate() {
        let line_num = idx + 2; // +1 for 0-index, +1 for header

        if line.trim().is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(DELIMITER).collect();
        let mut fields = HashMap::new();

        for (i, header) in headers.iter().enumerate() {
            let raw_value = values
                .get(i)
                .map(|s| s.trim().trim_matches('"'))
                .unwrap_or("");

            fields.insert(header.clone(), raw_value.to_string());
        }

        rows.push(Row {
            line: line_num,
            fields,
        });
    }

    Ok(RowSet { headers, rows })
}
