//! Tabular data: line parsing, cell typing and bounded previews.

pub mod cell;
pub mod parser;
pub mod table;

pub use cell::{coerce, CellValue};
pub use parser::parse_line;
pub use table::{
    export_csv, next_row_choice, ParsedRow, TableData, DEFAULT_MAX_ROWS, DEFAULT_PREVIEW_ROWS,
    PREVIEW_ROW_CHOICES,
};
