use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Core session models

pub const PENDING_ANSWER: &str = "Processing...";
pub const NO_RESULT_ANSWER: &str = "No result provided from API.";

/// Kind of file, decided by its name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Workbook,
    Pdf,
    Unsupported,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            FileKind::Csv
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            FileKind::Workbook
        } else if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else {
            FileKind::Unsupported
        }
    }
}

/// Raw payload of an uploaded file
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    pub fn len(&self) -> usize {
        match self {
            FileContent::Text(s) => s.len(),
            FileContent::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            FileContent::Text(s) => s.as_bytes().to_vec(),
            FileContent::Binary(b) => b.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub content: FileContent,
}

impl UploadedFile {
    /// Create a file record with a freshly generated identifier.
    pub fn new(name: impl Into<String>, content: FileContent) -> Self {
        Self {
            id: format!("file-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            content,
        }
    }

    /// Load a file from disk. Comma-separated files are read as text.
    pub async fn load(path: &std::path::Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        let content = match FileKind::from_name(&name) {
            FileKind::Csv => match String::from_utf8(bytes) {
                Ok(text) => FileContent::Text(text),
                Err(e) => FileContent::Binary(e.into_bytes()),
            },
            _ => FileContent::Binary(bytes),
        };
        Ok(Self::new(name, content))
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackKind::Positive => write!(f, "positive"),
            FeedbackKind::Negative => write!(f, "negative"),
        }
    }
}

/// Lifecycle of a submitted prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStatus {
    Pending,
    Answered,
    Failed,
}

/// One recorded question/answer exchange tied to an uploaded file
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub id: String,
    pub prompt: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    pub file_id: String,
    pub file_name: String,
    pub feedback: Option<FeedbackKind>,
    pub status: PromptStatus,
}

// API Request/Response types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub result_id: String,
    pub feedback_type: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FeedbackRequest {
    pub fn for_item(item: &HistoryItem, kind: FeedbackKind) -> Self {
        Self {
            result_id: item.id.clone(),
            feedback_type: kind,
            file_id: Some(item.file_id.clone()),
            prompt: Some(item.prompt.clone()),
            answer: Some(item.answer.clone()),
            comment: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub feedback_id: Option<serde_json::Value>,
}

/// Upload response; `parsed_data` is required for a usable preview
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub parsed_data: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    #[serde(default)]
    pub column_headers: Option<Vec<String>>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
