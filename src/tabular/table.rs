//! Tabular preview builder
//!
//! Holds the full (capped) parsed row set so the preview size can change
//! without parsing again.

use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

use super::cell::{coerce, CellValue};
use super::parser::{parse_aligned, parse_line};
use crate::types::{AppError, AppResult};

/// Upper bound on data rows kept from one file.
pub const DEFAULT_MAX_ROWS: usize = 500;

/// Row counts offered by the preview selector.
pub const PREVIEW_ROW_CHOICES: [usize; 5] = [5, 10, 20, 50, 100];

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data row, keyed by column name in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRow {
    cells: Vec<(String, CellValue)>,
}

impl ParsedRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    /// Value for `column`, or `Empty` when the row has no such column.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ParsedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Column headers plus every parsed row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

impl TableData {
    /// Build a table from delimited text.
    ///
    /// The first non-blank line is the header. Blank lines are skipped and at
    /// most `max_rows` data rows are kept. A repeated header name gets a
    /// numeric suffix (`a`, `a_2`) so every column stays addressable.
    pub fn from_delimited(content: &str, delimiter: char, max_rows: usize) -> AppResult<Self> {
        let mut lines = content.split('\n').filter(|line| !line.trim().is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| AppError::Parse("file contains no header row".to_string()))?;
        let headers = unique_headers(parse_line(header_line, delimiter));

        let rows: Vec<ParsedRow> = lines
            .take(max_rows)
            .map(|line| {
                let fields = parse_aligned(line, delimiter, headers.len());
                ParsedRow::new(
                    headers
                        .iter()
                        .cloned()
                        .zip(fields.iter().map(|f| coerce(f)))
                        .collect(),
                )
            })
            .collect();

        debug!(columns = headers.len(), rows = rows.len(), "Parsed delimited text");
        Ok(Self { headers, rows })
    }

    /// Build a table from the analysis service's upload response.
    ///
    /// Column order comes from `column_headers` when given, otherwise from the
    /// key order of the first row.
    pub fn from_remote(
        parsed_data: &[serde_json::Map<String, serde_json::Value>],
        column_headers: Option<&[String]>,
        max_rows: usize,
    ) -> Self {
        let headers: Vec<String> = match column_headers {
            Some(headers) if !headers.is_empty() => headers.to_vec(),
            _ => parsed_data
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default(),
        };

        let rows = parsed_data
            .iter()
            .take(max_rows)
            .map(|record| {
                ParsedRow::new(
                    headers
                        .iter()
                        .map(|h| {
                            let value = record.get(h).map(CellValue::from_json).unwrap_or_default();
                            (h.clone(), value)
                        })
                        .collect(),
                )
            })
            .collect();

        Self { headers, rows }
    }

    /// At most `requested` rows, never more than are available.
    pub fn preview(&self, requested: usize) -> &[ParsedRow] {
        &self.rows[..requested.min(self.rows.len())]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 2;
        while headers.contains(&candidate) {
            candidate = format!("{}_{}", name, n);
            n += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Next entry in [`PREVIEW_ROW_CHOICES`] after `current`, wrapping around.
pub fn next_row_choice(current: usize) -> usize {
    PREVIEW_ROW_CHOICES
        .iter()
        .copied()
        .find(|choice| *choice > current)
        .unwrap_or(PREVIEW_ROW_CHOICES[0])
}

/// Write the first `rows` rows of `table` as comma-separated text.
pub fn export_csv(table: &TableData, rows: usize, path: &Path) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    let preview = table.preview(rows);
    for row in preview {
        wtr.write_record(table.headers.iter().map(|h| row.get(h).to_string()))?;
    }
    wtr.flush()?;
    Ok(preview.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_name_example() {
        let content = "name,age\nJohn,30\n\"Doe, Jane\",25\n";
        let table = TableData::from_delimited(content, ',', DEFAULT_MAX_ROWS).unwrap();

        assert_eq!(table.headers, vec!["name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].get("name"), &CellValue::Text("John".into()));
        assert_eq!(table.rows[0].get("age"), &CellValue::Number(30.0));
        assert_eq!(table.rows[1].get("name"), &CellValue::Text("Doe, Jane".into()));
        assert_eq!(table.rows[1].get("age"), &CellValue::Number(25.0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = TableData::from_delimited("a,b,c\n1\n", ',', DEFAULT_MAX_ROWS).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("a"), &CellValue::Number(1.0));
        assert_eq!(row.get("b"), &CellValue::Empty);
        assert_eq!(row.get("c"), &CellValue::Empty);
    }

    #[test]
    fn test_every_row_has_every_header() {
        let table =
            TableData::from_delimited("x,y\n1,2,3\n\n4\n,\n", ',', DEFAULT_MAX_ROWS).unwrap();
        for row in &table.rows {
            assert_eq!(row.columns().collect::<Vec<_>>(), vec!["x", "y"]);
        }
    }

    #[test]
    fn test_duplicate_headers_keep_every_column() {
        let table = TableData::from_delimited("a,a,b,a\n1,2,3,4\n", ',', DEFAULT_MAX_ROWS).unwrap();
        assert_eq!(table.headers, vec!["a", "a_2", "b", "a_3"]);

        let shown: Vec<String> = table
            .headers
            .iter()
            .map(|h| table.rows[0].get(h).to_string())
            .collect();
        assert_eq!(shown, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table =
            TableData::from_delimited("a\r\n\r\n1\r\n   \r\n2\r\n", ',', DEFAULT_MAX_ROWS).unwrap();
        assert_eq!(table.headers, vec!["a"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows_cap() {
        let mut content = String::from("n\n");
        for i in 0..20 {
            content.push_str(&format!("{}\n", i));
        }
        let table = TableData::from_delimited(&content, ',', 5).unwrap();
        assert_eq!(table.row_count(), 5);
    }

    #[test]
    fn test_empty_content_is_parse_error() {
        assert!(matches!(
            TableData::from_delimited("\n \n", ',', DEFAULT_MAX_ROWS),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_preview_bounds() {
        let table = TableData::from_delimited("a\n1\n2\n3\n", ',', DEFAULT_MAX_ROWS).unwrap();
        assert_eq!(table.preview(2).len(), 2);
        assert_eq!(table.preview(100).len(), 3);
        assert_eq!(table.preview(0).len(), 0);
        assert!(TableData::default().preview(10).is_empty());
    }

    #[test]
    fn test_from_remote_uses_given_headers() {
        let data: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(
            r#"[{"age": 30, "name": "John"}, {"name": "Jane"}]"#,
        )
        .unwrap();
        let headers = vec!["name".to_string(), "age".to_string()];
        let table = TableData::from_remote(&data, Some(&headers), DEFAULT_MAX_ROWS);

        assert_eq!(table.headers, headers);
        assert_eq!(table.rows[0].columns().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(table.rows[1].get("age"), &CellValue::Empty);
    }

    #[test]
    fn test_from_remote_falls_back_to_first_row_order() {
        let data: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(r#"[{"zeta": 1, "alpha": null}]"#).unwrap();
        let table = TableData::from_remote(&data, None, DEFAULT_MAX_ROWS);
        assert_eq!(table.headers, vec!["zeta", "alpha"]);
        assert_eq!(table.rows[0].get("alpha"), &CellValue::Empty);

        let empty = TableData::from_remote(&[], None, DEFAULT_MAX_ROWS);
        assert!(empty.headers.is_empty());
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let table =
            TableData::from_delimited("name,age\nJohn,30\n", ',', DEFAULT_MAX_ROWS).unwrap();
        let json = serde_json::to_string(&table.rows[0]).unwrap();
        assert_eq!(json, r#"{"name":"John","age":30.0}"#);
    }

    #[test]
    fn test_next_row_choice_wraps() {
        assert_eq!(next_row_choice(5), 10);
        assert_eq!(next_row_choice(10), 20);
        assert_eq!(next_row_choice(100), 5);
        assert_eq!(next_row_choice(7), 10);
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.csv");
        let table = TableData::from_delimited(
            "name,age\nJohn,30\n\"Doe, Jane\",25\nAl,40\n",
            ',',
            DEFAULT_MAX_ROWS,
        )
        .unwrap();

        let written = export_csv(&table, 2, &path).unwrap();
        assert_eq!(written, 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,age\nJohn,30\n\"Doe, Jane\",25\n");
    }
}
