//! File ingestion
//!
//! One routine turns an uploaded file into a [`TableData`], used both on first
//! upload and when an earlier file is selected again.

use tracing::{info, warn};

use crate::gateway::AnalysisGateway;
use crate::models::{FileContent, FileKind, UploadedFile};
use crate::tabular::TableData;
use crate::types::{AppError, AppResult};

pub const PDF_UNSUPPORTED_MESSAGE: &str =
    "PDF files are not supported for data analysis. Please convert to CSV or Excel format.";

pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Please upload a CSV or Excel file.";

/// Build the preview table for `file`.
///
/// Comma-separated files are parsed locally. Workbooks are sent to the
/// analysis service, which returns the parsed rows.
pub async fn load_table(
    file: &UploadedFile,
    gateway: &dyn AnalysisGateway,
    max_rows: usize,
) -> AppResult<TableData> {
    match file.kind() {
        FileKind::Csv => {
            let text = match &file.content {
                FileContent::Text(text) => text.as_str(),
                FileContent::Binary(bytes) => std::str::from_utf8(bytes)
                    .map_err(|e| AppError::Parse(format!("file is not valid UTF-8 text: {}", e)))?,
            };
            let table = TableData::from_delimited(text, ',', max_rows)?;
            info!(file = %file.name, rows = table.row_count(), "Parsed file locally");
            Ok(table)
        }
        FileKind::Workbook => {
            let upload = gateway.upload(file).await?;
            let rows = upload.parsed_data.ok_or_else(|| {
                AppError::InvalidResponse("No parsed data received from server".to_string())
            })?;
            let table = TableData::from_remote(&rows, upload.column_headers.as_deref(), max_rows);
            info!(file = %file.name, rows = table.row_count(), "Loaded workbook from service");
            Ok(table)
        }
        FileKind::Pdf => {
            warn!(file = %file.name, "Rejected PDF upload");
            Err(AppError::UnsupportedFormat(PDF_UNSUPPORTED_MESSAGE.to_string()))
        }
        FileKind::Unsupported => {
            warn!(file = %file.name, "Rejected unsupported upload");
            Err(AppError::UnsupportedFormat(UNSUPPORTED_FORMAT_MESSAGE.to_string()))
        }
    }
}

/// Register a locally parsed file with the analysis service so later prompts
/// have context. Failures are logged and returned for display as a notice.
pub async fn register_with_service(
    file: &UploadedFile,
    gateway: &dyn AnalysisGateway,
) -> AppResult<()> {
    match gateway.upload(file).await {
        Ok(_) => {
            info!(file = %file.name, file_id = %file.id, "Registered file with service");
            Ok(())
        }
        Err(e) => {
            warn!(file = %file.name, error = %e, "Could not register file with service");
            Err(e)
        }
    }
}
