//! Session state
//!
//! Owns the uploaded files, the active file, the question/answer history and
//! the preview table. Every mutation happens on the task that owns the
//! session; network work reports back through tokens.

pub mod prompt;

pub use prompt::run_prompt;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::{
    AnalyzeRequest, AnalyzeResponse, FeedbackKind, FeedbackRequest, HistoryItem, PromptStatus,
    UploadedFile, NO_RESULT_ANSWER, PENDING_ANSWER,
};
use crate::tabular::{next_row_choice, ParsedRow, TableData, DEFAULT_PREVIEW_ROWS};
use crate::types::{AppError, AppResult};

/// Handle for one submitted prompt. The token is the placeholder's id until
/// the answer arrives.
#[derive(Debug, Clone)]
pub struct PromptTicket {
    pub token: String,
    pub request: AnalyzeRequest,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableState {
    #[default]
    Empty,
    Loading,
    Ready(TableData),
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    files: Vec<UploadedFile>,
    active_file: Option<String>,
    history: Vec<HistoryItem>,
    table: TableState,
    preview_rows: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_ROWS)
    }
}

impl Session {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            files: Vec::new(),
            active_file: None,
            history: Vec::new(),
            table: TableState::Empty,
            preview_rows,
        }
    }

    // Files

    /// Append files and return their ids. The first new file becomes active
    /// when nothing is selected yet.
    pub fn add_files(&mut self, files: Vec<UploadedFile>) -> Vec<String> {
        let ids: Vec<String> = files.iter().map(|f| f.id.clone()).collect();
        for file in &files {
            info!(file = %file.name, file_id = %file.id, bytes = file.content.len(), "File added");
        }
        self.files.extend(files);

        if self.active_file.is_none() {
            if let Some(first) = ids.first() {
                self.activate(first.clone());
            }
        }
        ids
    }

    /// Make `file_id` the active file. Returns `None` for an unknown id, in
    /// which case nothing changes.
    pub fn select_file(&mut self, file_id: &str) -> Option<&UploadedFile> {
        if !self.files.iter().any(|f| f.id == file_id) {
            warn!(file_id, "Ignoring selection of unknown file");
            return None;
        }
        self.activate(file_id.to_string());
        self.active_file()
    }

    fn activate(&mut self, file_id: String) {
        debug!(file_id = %file_id, "Active file changed");
        self.active_file = Some(file_id);
        self.table = TableState::Loading;
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn file(&self, file_id: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn active_file(&self) -> Option<&UploadedFile> {
        self.active_file.as_deref().and_then(|id| self.file(id))
    }

    pub fn active_file_id(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    // Prompts

    /// Insert a pending placeholder at the head of the history and return
    /// the request to send.
    pub fn begin_prompt(&mut self, prompt: &str) -> AppResult<PromptTicket> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::EmptyPrompt);
        }
        let file = self.active_file().ok_or(AppError::NoActiveFile)?;

        let token = format!("temp-{}", uuid::Uuid::new_v4());
        let item = HistoryItem {
            id: token.clone(),
            prompt: prompt.to_string(),
            answer: PENDING_ANSWER.to_string(),
            timestamp: Utc::now(),
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            feedback: None,
            status: PromptStatus::Pending,
        };
        let request = AnalyzeRequest {
            prompt: item.prompt.clone(),
            file_id: Some(item.file_id.clone()),
        };

        info!(token = %token, file = %item.file_name, "Prompt submitted");
        self.history.insert(0, item);
        Ok(PromptTicket { token, request })
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Returns `false` when no pending placeholder carries that token, which
    /// makes repeated delivery harmless.
    pub fn resolve_prompt(&mut self, token: &str, outcome: AppResult<AnalyzeResponse>) -> bool {
        let Some(item) = self
            .history
            .iter_mut()
            .find(|item| item.id == token && item.status == PromptStatus::Pending)
        else {
            debug!(token, "No pending prompt for token");
            return false;
        };

        match outcome {
            Ok(response) => {
                item.id = response
                    .id
                    .unwrap_or_else(|| format!("result-{}", Utc::now().timestamp_millis()));
                item.answer = response
                    .result
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| NO_RESULT_ANSWER.to_string());
                item.status = PromptStatus::Answered;
                info!(token, result_id = %item.id, "Prompt answered");
            }
            Err(e) => {
                item.answer = e.user_message();
                item.status = PromptStatus::Failed;
                warn!(token, error = %e, "Prompt failed");
            }
        }
        true
    }

    pub fn pending_count(&self) -> usize {
        self.history
            .iter()
            .filter(|item| item.status == PromptStatus::Pending)
            .count()
    }

    // History

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    /// Items for one file, newest first.
    pub fn history_for(&self, file_id: &str) -> Vec<&HistoryItem> {
        self.history.iter().filter(|item| item.file_id == file_id).collect()
    }

    pub fn history_for_active(&self) -> Vec<&HistoryItem> {
        match self.active_file.as_deref() {
            Some(id) => self.history_for(id),
            None => Vec::new(),
        }
    }

    pub fn history_item(&self, id: &str) -> Option<&HistoryItem> {
        self.history.iter().find(|item| item.id == id)
    }

    /// Prompt text of a past item, with its file made active again.
    pub fn reuse(&mut self, history_id: &str) -> Option<String> {
        let item = self.history_item(history_id)?;
        let prompt = item.prompt.clone();
        let file_id = item.file_id.clone();
        self.select_file(&file_id);
        Some(prompt)
    }

    /// Request body for rating an answered item. Pending and failed items
    /// have no server-side id to rate.
    pub fn feedback_request(&self, id: &str, kind: FeedbackKind) -> Option<FeedbackRequest> {
        self.history_item(id)
            .filter(|item| item.status == PromptStatus::Answered)
            .map(|item| FeedbackRequest::for_item(item, kind))
    }

    /// Mark an item with feedback once the service has accepted it.
    pub fn record_feedback(&mut self, id: &str, kind: FeedbackKind) -> bool {
        match self.history.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.feedback = Some(kind);
                info!(result_id = id, feedback = %kind, "Feedback recorded");
                true
            }
            None => false,
        }
    }

    // Table

    /// Store a freshly loaded table. Loads for a file that is no longer
    /// active are dropped.
    pub fn set_table(&mut self, file_id: &str, table: TableData) -> bool {
        if self.active_file.as_deref() != Some(file_id) {
            debug!(file_id, "Discarding table for inactive file");
            return false;
        }
        self.table = TableState::Ready(table);
        true
    }

    /// Replace the table with a message, as after a failed load.
    pub fn clear_table(&mut self, file_id: &str, message: impl Into<String>) -> bool {
        if self.active_file.as_deref() != Some(file_id) {
            return false;
        }
        self.table = TableState::Unavailable(message.into());
        true
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    /// Rows currently shown, bounded by the preview size.
    pub fn preview(&self) -> &[ParsedRow] {
        match &self.table {
            TableState::Ready(table) => table.preview(self.preview_rows),
            _ => &[],
        }
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    pub fn set_preview_rows(&mut self, rows: usize) {
        self.preview_rows = rows;
    }

    pub fn cycle_preview_rows(&mut self) -> usize {
        self.preview_rows = next_row_choice(self.preview_rows);
        self.preview_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileContent;
    use std::time::Duration;

    fn csv(name: &str) -> UploadedFile {
        UploadedFile::new(name, FileContent::Text("name,age\nJohn,30\n".to_string()))
    }

    fn answer(id: &str, result: &str) -> AppResult<AnalyzeResponse> {
        Ok(AnalyzeResponse {
            result: Some(result.to_string()),
            id: Some(id.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_first_file_becomes_active() {
        let mut session = Session::default();
        assert!(session.active_file().is_none());

        let ids = session.add_files(vec![csv("a.csv"), csv("b.csv")]);
        assert_eq!(ids.len(), 2);
        assert_eq!(session.active_file_id(), Some(ids[0].as_str()));
        assert_eq!(session.table(), &TableState::Loading);

        let more = session.add_files(vec![csv("c.csv")]);
        assert_eq!(session.active_file_id(), Some(ids[0].as_str()));
        assert_eq!(session.files().len(), 3);
        assert_ne!(more[0], ids[0]);
    }

    #[test]
    fn test_select_unknown_file_is_ignored() {
        let mut session = Session::default();
        let ids = session.add_files(vec![csv("a.csv")]);
        assert!(session.select_file("file-missing").is_none());
        assert_eq!(session.active_file_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn test_begin_prompt_requires_file_and_text() {
        let mut session = Session::default();
        assert!(matches!(session.begin_prompt("Summarize"), Err(AppError::NoActiveFile)));

        session.add_files(vec![csv("a.csv")]);
        assert!(matches!(session.begin_prompt("   "), Err(AppError::EmptyPrompt)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_placeholder_inserted_at_head() {
        let mut session = Session::default();
        let ids = session.add_files(vec![csv("a.csv")]);

        let first = session.begin_prompt("first").unwrap();
        let second = session.begin_prompt("second").unwrap();

        let history = session.history();
        assert_eq!(history[0].id, second.token);
        assert_eq!(history[1].id, first.token);
        assert_eq!(history[0].answer, PENDING_ANSWER);
        assert_eq!(history[0].status, PromptStatus::Pending);
        assert_eq!(history[0].file_id, ids[0]);
        assert!(first.token.starts_with("temp-"));
        assert_eq!(second.request.file_id.as_deref(), Some(ids[0].as_str()));
        assert_eq!(session.pending_count(), 2);
    }

    #[test]
    fn test_reverse_order_resolution() {
        let mut session = Session::default();
        session.add_files(vec![csv("a.csv")]);
        let a = session.begin_prompt("prompt A").unwrap();
        let b = session.begin_prompt("prompt B").unwrap();

        assert!(session.resolve_prompt(&b.token, answer("result_b", "answer B")));
        assert!(session.resolve_prompt(&a.token, answer("result_a", "answer A")));

        let a_item = session.history_item("result_a").unwrap();
        let b_item = session.history_item("result_b").unwrap();
        assert_eq!(a_item.prompt, "prompt A");
        assert_eq!(a_item.answer, "answer A");
        assert_eq!(b_item.prompt, "prompt B");
        assert_eq!(b_item.answer, "answer B");
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut session = Session::default();
        session.add_files(vec![csv("a.csv")]);
        let ticket = session.begin_prompt("q").unwrap();

        assert!(session.resolve_prompt(&ticket.token, answer("result_1", "first")));
        assert!(!session.resolve_prompt(&ticket.token, answer("result_2", "second")));
        assert_eq!(session.history()[0].answer, "first");

        let failed = session.begin_prompt("q2").unwrap();
        assert!(session.resolve_prompt(
            &failed.token,
            Err(AppError::Timeout(Duration::from_secs(10)))
        ));
        assert!(!session.resolve_prompt(&failed.token, answer("result_3", "late")));
        assert_eq!(session.history()[0].status, PromptStatus::Failed);
    }

    #[test]
    fn test_missing_result_and_id_fallbacks() {
        let mut session = Session::default();
        session.add_files(vec![csv("a.csv")]);
        let ticket = session.begin_prompt("q").unwrap();

        session.resolve_prompt(&ticket.token, Ok(AnalyzeResponse::default()));
        let item = &session.history()[0];
        assert_eq!(item.answer, NO_RESULT_ANSWER);
        assert!(item.id.starts_with("result-"));
        assert_eq!(item.status, PromptStatus::Answered);
    }

    #[test]
    fn test_failure_sets_user_message() {
        let mut session = Session::default();
        session.add_files(vec![csv("a.csv")]);
        let ticket = session.begin_prompt("q").unwrap();

        session.resolve_prompt(&ticket.token, Err(AppError::NotFound("/api/analyze".into())));
        assert_eq!(
            session.history()[0].answer,
            "API endpoint not found. The backend might be misconfigured."
        );
    }

    #[test]
    fn test_history_filters_by_file() {
        let mut session = Session::default();
        let ids = session.add_files(vec![csv("a.csv"), csv("b.csv")]);
        session.begin_prompt("about a").unwrap();
        session.select_file(&ids[1]);
        session.begin_prompt("about b 1").unwrap();
        session.begin_prompt("about b 2").unwrap();

        let b: Vec<_> = session.history_for_active().iter().map(|i| i.prompt.clone()).collect();
        assert_eq!(b, vec!["about b 2", "about b 1"]);
        assert_eq!(session.history_for(&ids[0]).len(), 1);
    }

    #[test]
    fn test_reuse_reactivates_file() {
        let mut session = Session::default();
        let ids = session.add_files(vec![csv("a.csv"), csv("b.csv")]);
        let ticket = session.begin_prompt("Summarize").unwrap();
        session.resolve_prompt(&ticket.token, answer("result_1", "ok"));
        session.select_file(&ids[1]);

        assert_eq!(session.reuse("result_1").as_deref(), Some("Summarize"));
        assert_eq!(session.active_file_id(), Some(ids[0].as_str()));
        assert!(session.reuse("result_missing").is_none());
    }

    #[test]
    fn test_feedback_only_for_answered_items() {
        let mut session = Session::default();
        session.add_files(vec![csv("a.csv")]);
        let pending = session.begin_prompt("q").unwrap();
        assert!(session.feedback_request(&pending.token, FeedbackKind::Positive).is_none());

        session.resolve_prompt(&pending.token, answer("result_1", "ok"));
        let request = session.feedback_request("result_1", FeedbackKind::Negative).unwrap();
        assert_eq!(request.result_id, "result_1");
        assert_eq!(request.answer.as_deref(), Some("ok"));

        assert!(session.record_feedback("result_1", FeedbackKind::Negative));
        assert_eq!(session.history()[0].feedback, Some(FeedbackKind::Negative));
        assert!(!session.record_feedback("result_missing", FeedbackKind::Positive));
    }

    #[test]
    fn test_stale_table_load_is_dropped() {
        let mut session = Session::default();
        let ids = session.add_files(vec![csv("a.csv"), csv("b.csv")]);
        session.select_file(&ids[1]);

        let table = TableData::from_delimited("a\n1\n", ',', 10).unwrap();
        assert!(!session.set_table(&ids[0], table.clone()));
        assert_eq!(session.table(), &TableState::Loading);

        assert!(session.set_table(&ids[1], table));
        assert_eq!(session.preview().len(), 1);

        assert!(session.clear_table(&ids[1], "Unsupported"));
        assert!(session.preview().is_empty());
    }

    #[test]
    fn test_preview_rows_cycle() {
        let mut session = Session::default();
        assert_eq!(session.preview_rows(), 10);
        assert_eq!(session.cycle_preview_rows(), 20);
        session.set_preview_rows(100);
        assert_eq!(session.cycle_preview_rows(), 5);
    }
}
