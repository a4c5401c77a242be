// tabletalk - ask natural-language questions about spreadsheet data

pub mod config;
pub mod diagnostics;
pub mod gateway;
pub mod ingest;
pub mod models;
pub mod session;
pub mod tabular;
pub mod tui;       // Terminal User Interface
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use gateway::{AnalysisGateway, HttpGateway};
pub use session::Session;
pub use tabular::TableData;
pub use types::{AppError, AppResult};
