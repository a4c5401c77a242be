//! Application State
//!
//! Owns the [`Session`] and applies completions from background tasks to it.
//! Network work never touches the session directly; it reports back over
//! the `AppEvent` channel.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::KeyCode;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tui_textarea::{CursorMove, TextArea};

use crate::config::Config;
use crate::diagnostics::{self, DiagnosticsReport};
use crate::gateway::AnalysisGateway;
use crate::ingest;
use crate::models::{AnalyzeResponse, FeedbackKind, FileKind, HistoryItem, UploadedFile};
use crate::session::{run_prompt, Session, TableState};
use crate::tabular::{export_csv, TableData, PREVIEW_ROW_CHOICES};
use crate::tui::event::AppAction;
use crate::types::{AppError, AppResult};

const INPUT_PLACEHOLDER: &str = "Ask a question about your data, or /open <path>";

/// Lines moved by one PageUp/PageDown in the answer pane
const ANSWER_PAGE: u16 = 5;

/// Example questions offered by `/suggest` and F4
pub const SUGGESTIONS: [&str; 8] = [
    "Summarize the key insights from this dataset",
    "What are the trends in this data?",
    "Find any outliers in the dataset",
    "Calculate the correlation between column A and column B",
    "Create a segment analysis of the data by category",
    "What are the top 5 values in this dataset?",
    "Is there any missing data and how significant is it?",
    "What patterns can you identify in this data?",
];

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Main,
    Help,
    Diagnostics,
    Suggestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One-line message for the status bar
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    BackendChecked(bool),
    FilesOpened {
        files: Vec<UploadedFile>,
        errors: Vec<String>,
    },
    TableLoaded {
        file_id: String,
        result: AppResult<TableData>,
    },
    Registered {
        file_name: String,
        error: Option<String>,
    },
    PromptResolved {
        token: String,
        result: AppResult<AnalyzeResponse>,
    },
    FeedbackDone {
        result_id: String,
        kind: FeedbackKind,
        error: Option<String>,
    },
    DiagnosticsDone(DiagnosticsReport),
}

/// Text commands typed into the input box
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(Vec<PathBuf>),
    Rows(Option<usize>),
    Export(PathBuf),
    Diagnose,
    Help,
    /// `/suggest` lists examples, `/suggest n` fills the input with one
    Suggest(Option<usize>),
    Prompt(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let Some(rest) = input.strip_prefix('/') else {
            return Some(Command::Prompt(input.to_string()));
        };

        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let args = args.trim();
        match name {
            "open" if !args.is_empty() => Some(Command::Open(
                args.split_whitespace().map(PathBuf::from).collect(),
            )),
            "rows" => Some(Command::Rows(args.parse().ok())),
            "export" if !args.is_empty() => Some(Command::Export(PathBuf::from(args))),
            "diagnose" => Some(Command::Diagnose),
            "help" => Some(Command::Help),
            "suggest" => Some(Command::Suggest(args.parse().ok())),
            _ => Some(Command::Prompt(input.to_string())),
        }
    }
}

/// Main application state
pub struct App {
    pub config: Config,
    pub session: Session,

    // UI State
    pub view: View,
    pub should_quit: bool,
    pub input: TextArea<'static>,
    pub history_cursor: usize,
    pub backend: BackendStatus,
    pub notice: Option<Notice>,
    pub diagnostics: Option<DiagnosticsReport>,
    pub loading_table: bool,
    pub tick: u64,
    pub answer_scroll: u16,
    answer_max_scroll: u16,
    quit_armed: bool,

    gateway: Arc<dyn AnalysisGateway>,

    // Async communication
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(config: Config, gateway: Arc<dyn AnalysisGateway>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);
        let session = Session::new(config.data.preview_rows);

        Self {
            config,
            session,
            view: View::Main,
            should_quit: false,
            input: Self::empty_input(),
            history_cursor: 0,
            backend: BackendStatus::Unknown,
            notice: None,
            diagnostics: None,
            loading_table: false,
            tick: 0,
            answer_scroll: 0,
            answer_max_scroll: 0,
            quit_armed: false,
            gateway,
            event_rx,
            event_tx,
        }
    }

    fn empty_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(INPUT_PLACEHOLDER);
        input
    }

    /// Kick off the startup probe and open any files given on the command line.
    pub fn start(&mut self, paths: Vec<PathBuf>) {
        self.check_backend();
        if !paths.is_empty() {
            self.open_files(paths);
        }
    }

    /// Quitting with prompts in flight takes a second Ctrl+Q.
    pub fn confirm_quit(&mut self) -> bool {
        let pending = self.session.pending_count();
        if pending == 0 || self.quit_armed {
            return true;
        }
        self.quit_armed = true;
        self.notify(
            NoticeLevel::Warning,
            format!("{} prompt(s) still running; press Ctrl+Q again to quit", pending),
        );
        false
    }

    /// Clamp the answer scroll to the rendered content
    pub fn update_answer_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.answer_max_scroll = content_height.saturating_sub(viewport_height);
        if self.answer_scroll > self.answer_max_scroll {
            self.answer_scroll = self.answer_max_scroll;
        }
    }

    fn select_history(&mut self, cursor: usize) {
        self.history_cursor = cursor;
        self.answer_scroll = 0;
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BackendChecked(online) => {
                self.backend = if online {
                    BackendStatus::Online
                } else {
                    BackendStatus::Offline
                };
            }
            AppEvent::FilesOpened { files, errors } => {
                for err in errors {
                    self.notify(NoticeLevel::Error, err);
                }
                if files.is_empty() {
                    return;
                }
                let had_active = self.session.active_file_id().is_some();
                let registrations: Vec<UploadedFile> = files
                    .iter()
                    .filter(|f| f.kind() == FileKind::Csv)
                    .cloned()
                    .collect();
                let count = files.len();
                self.session.add_files(files);
                self.notify(NoticeLevel::Info, format!("{} file(s) uploaded", count));

                for file in registrations {
                    self.register_file(file);
                }
                if !had_active {
                    self.load_active_table();
                }
            }
            AppEvent::TableLoaded { file_id, result } => {
                let applied = match result {
                    Ok(table) => self.session.set_table(&file_id, table),
                    Err(e) => {
                        let message = e.user_message();
                        let applied = self.session.clear_table(&file_id, message.clone());
                        if applied {
                            self.notify(NoticeLevel::Error, message);
                        }
                        applied
                    }
                };
                if applied {
                    self.loading_table = false;
                }
            }
            AppEvent::Registered { file_name, error } => {
                if let Some(err) = error {
                    self.notify(
                        NoticeLevel::Warning,
                        format!("{} was not registered with the service: {}", file_name, err),
                    );
                }
            }
            AppEvent::PromptResolved { token, result } => {
                match &result {
                    Ok(_) => self.backend = BackendStatus::Online,
                    Err(AppError::Connectivity(_)) => self.backend = BackendStatus::Offline,
                    Err(_) => {}
                }
                self.session.resolve_prompt(&token, result);
            }
            AppEvent::FeedbackDone {
                result_id,
                kind,
                error,
            } => match error {
                None => {
                    self.session.record_feedback(&result_id, kind);
                    self.notify(NoticeLevel::Info, "Feedback submitted".to_string());
                }
                Some(err) => {
                    self.notify(
                        NoticeLevel::Error,
                        format!("Failed to submit feedback: {}", err),
                    );
                }
            },
            AppEvent::DiagnosticsDone(report) => {
                self.backend = if report.checks.first().map(|c| c.is_ok()).unwrap_or(false) {
                    BackendStatus::Online
                } else {
                    BackendStatus::Offline
                };
                self.diagnostics = Some(report);
            }
        }
    }

    /// Handle a user action
    pub fn handle_action(&mut self, action: AppAction) {
        if !matches!(action, AppAction::Quit | AppAction::Tick) {
            self.quit_armed = false;
        }

        match action {
            AppAction::Quit => {
                if self.confirm_quit() {
                    self.should_quit = true;
                }
            }
            AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => {
                if self.view == View::Main {
                    self.submit_input();
                }
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Main
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                self.view = View::Main;
            }
            AppAction::NextFile => self.step_file(1),
            AppAction::PrevFile => self.step_file(-1),
            AppAction::HistoryUp => {
                self.select_history(self.history_cursor.saturating_sub(1));
            }
            AppAction::HistoryDown => {
                let len = self.session.history_for_active().len();
                if self.history_cursor + 1 < len {
                    self.select_history(self.history_cursor + 1);
                }
            }
            AppAction::AnswerPageUp => {
                self.answer_scroll = self.answer_scroll.saturating_sub(ANSWER_PAGE);
            }
            AppAction::AnswerPageDown => {
                self.answer_scroll = self
                    .answer_scroll
                    .saturating_add(ANSWER_PAGE)
                    .min(self.answer_max_scroll);
            }
            AppAction::ToggleSuggestions => {
                self.view = if self.view == View::Suggestions {
                    View::Main
                } else {
                    View::Suggestions
                };
            }
            AppAction::Feedback(kind) => self.submit_feedback(kind),
            AppAction::Reuse => self.reuse_selected(),
            AppAction::CycleRows => {
                let rows = self.session.cycle_preview_rows();
                self.notify(NoticeLevel::Info, format!("Showing {} rows", rows));
            }
            AppAction::Diagnose => self.run_diagnostics(),
            AppAction::Input(key_event) => match self.view {
                View::Main => {
                    self.input.input(key_event);
                }
                View::Suggestions => {
                    if let KeyCode::Char(c) = key_event.code {
                        if let Some(n) = c.to_digit(10) {
                            self.use_suggestion(n as usize);
                            return;
                        }
                    }
                    self.view = View::Main;
                }
                _ => self.view = View::Main,
            },
            AppAction::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        match level {
            NoticeLevel::Error => warn!(notice = %text, "Error shown to user"),
            _ => info!(notice = %text, "Notice"),
        }
        self.notice = Some(Notice { level, text });
    }

    /// History item under the cursor in the active file's history
    pub fn selected_history(&self) -> Option<&HistoryItem> {
        self.session
            .history_for_active()
            .get(self.history_cursor)
            .copied()
    }

    fn submit_input(&mut self) {
        let content = self.input.lines().join("\n");
        let Some(command) = Command::parse(&content) else {
            return;
        };
        self.input = Self::empty_input();

        match command {
            Command::Open(paths) => self.open_files(paths),
            Command::Rows(Some(rows)) if PREVIEW_ROW_CHOICES.contains(&rows) => {
                self.session.set_preview_rows(rows);
                self.notify(NoticeLevel::Info, format!("Showing {} rows", rows));
            }
            Command::Rows(Some(rows)) => {
                self.notify(
                    NoticeLevel::Warning,
                    format!(
                        "{} is not a preview size; choose one of {:?}",
                        rows, PREVIEW_ROW_CHOICES
                    ),
                );
            }
            Command::Rows(None) => {
                let rows = self.session.cycle_preview_rows();
                self.notify(NoticeLevel::Info, format!("Showing {} rows", rows));
            }
            Command::Export(path) => self.export_preview(path),
            Command::Diagnose => self.run_diagnostics(),
            Command::Help => self.view = View::Help,
            Command::Suggest(None) => self.view = View::Suggestions,
            Command::Suggest(Some(n)) => self.use_suggestion(n),
            Command::Prompt(prompt) => self.submit_prompt(&prompt),
        }
    }

    fn submit_prompt(&mut self, prompt: &str) {
        let ticket = match self.session.begin_prompt(prompt) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.notify(NoticeLevel::Warning, e.user_message());
                return;
            }
        };
        self.select_history(0);

        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        let timeout = self.config.api.timeout();
        tokio::spawn(async move {
            let result = run_prompt(gateway.as_ref(), &ticket.request, timeout).await;
            tx.send(AppEvent::PromptResolved {
                token: ticket.token,
                result,
            })
            .await
            .ok();
        });
    }

    fn open_files(&mut self, paths: Vec<PathBuf>) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut files = Vec::new();
            let mut errors = Vec::new();
            for path in paths {
                match UploadedFile::load(&path).await {
                    Ok(file) => files.push(file),
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "Failed to read file");
                        errors.push(format!("Error reading {}: {}", path.display(), e));
                    }
                }
            }
            tx.send(AppEvent::FilesOpened { files, errors }).await.ok();
        });
    }

    fn register_file(&self, file: UploadedFile) {
        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let error = ingest::register_with_service(&file, gateway.as_ref())
                .await
                .err()
                .map(|e| e.user_message());
            tx.send(AppEvent::Registered {
                file_name: file.name,
                error,
            })
            .await
            .ok();
        });
    }

    fn load_active_table(&mut self) {
        let Some(file) = self.session.active_file().cloned() else {
            return;
        };
        self.loading_table = true;
        self.select_history(0);

        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        let max_rows = self.config.data.max_parsed_rows;
        tokio::spawn(async move {
            let result = ingest::load_table(&file, gateway.as_ref(), max_rows).await;
            tx.send(AppEvent::TableLoaded {
                file_id: file.id,
                result,
            })
            .await
            .ok();
        });
    }

    fn step_file(&mut self, delta: isize) {
        let files = self.session.files();
        if files.len() < 2 {
            return;
        }
        let current = self
            .session
            .active_file_id()
            .and_then(|id| files.iter().position(|f| f.id == id))
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(files.len() as isize) as usize;
        let next_id = files[next].id.clone();

        if self.session.select_file(&next_id).is_some() {
            self.load_active_table();
        }
    }

    fn reuse_selected(&mut self) {
        let Some(id) = self.selected_history().map(|item| item.id.clone()) else {
            return;
        };
        let Some(prompt) = self.session.reuse(&id) else {
            return;
        };

        self.fill_input(prompt);

        // The file is parsed again even when it was already active
        self.load_active_table();
    }

    fn fill_input(&mut self, text: String) {
        let mut input = TextArea::new(vec![text]);
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(INPUT_PLACEHOLDER);
        input.move_cursor(CursorMove::End);
        self.input = input;
    }

    /// Put example question `n` (1-based) into the input box.
    fn use_suggestion(&mut self, n: usize) {
        match n.checked_sub(1).and_then(|i| SUGGESTIONS.get(i)) {
            Some(text) => {
                self.fill_input(text.to_string());
                self.view = View::Main;
            }
            None => self.notify(
                NoticeLevel::Warning,
                format!("Choose a suggestion between 1 and {}", SUGGESTIONS.len()),
            ),
        }
    }

    fn submit_feedback(&mut self, kind: FeedbackKind) {
        let Some(id) = self.selected_history().map(|item| item.id.clone()) else {
            return;
        };
        let Some(request) = self.session.feedback_request(&id, kind) else {
            self.notify(
                NoticeLevel::Warning,
                "Only answered prompts can be rated".to_string(),
            );
            return;
        };

        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let error = gateway
                .submit_feedback(&request)
                .await
                .err()
                .map(|e| e.to_string());
            tx.send(AppEvent::FeedbackDone {
                result_id: request.result_id,
                kind,
                error,
            })
            .await
            .ok();
        });
    }

    fn run_diagnostics(&mut self) {
        self.view = View::Diagnostics;
        self.diagnostics = None;

        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        let base_url = self.config.api.base_url.clone();
        tokio::spawn(async move {
            let report = diagnostics::run_diagnostics(gateway.as_ref(), &base_url).await;
            tx.send(AppEvent::DiagnosticsDone(report)).await.ok();
        });
    }

    fn check_backend(&self) {
        let tx = self.event_tx.clone();
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let online = match gateway.probe().await {
                Ok(_) => true,
                Err(e) => {
                    warn!(error = %e, "Startup probe failed");
                    false
                }
            };
            tx.send(AppEvent::BackendChecked(online)).await.ok();
        });
    }

    fn export_preview(&mut self, path: PathBuf) {
        let rows = self.session.preview_rows();
        let result = match self.session.table() {
            TableState::Ready(table) => Some(export_csv(table, rows, &path)),
            _ => None,
        };
        match result {
            Some(Ok(written)) => self.notify(
                NoticeLevel::Info,
                format!("Exported {} rows to {}", written, path.display()),
            ),
            Some(Err(e)) => self.notify(NoticeLevel::Error, format!("Export failed: {}", e)),
            None => self.notify(NoticeLevel::Warning, "No preview to export".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::models::{FileContent, PromptStatus};
    use crossterm::event::{KeyEvent, KeyModifiers};

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("What is the average age?"),
            Some(Command::Prompt("What is the average age?".into()))
        );
        assert_eq!(
            Command::parse("/open a.csv b.xlsx"),
            Some(Command::Open(vec!["a.csv".into(), "b.xlsx".into()]))
        );
        assert_eq!(Command::parse("/rows 50"), Some(Command::Rows(Some(50))));
        assert_eq!(Command::parse("/rows"), Some(Command::Rows(None)));
        assert_eq!(
            Command::parse("/export out.csv"),
            Some(Command::Export("out.csv".into()))
        );
        assert_eq!(Command::parse("/diagnose"), Some(Command::Diagnose));
        assert_eq!(Command::parse("/suggest"), Some(Command::Suggest(None)));
        assert_eq!(Command::parse("/suggest 4"), Some(Command::Suggest(Some(4))));
        assert_eq!(
            Command::parse("/unknown thing"),
            Some(Command::Prompt("/unknown thing".into()))
        );
    }

    fn app(gateway: FakeGateway) -> App {
        App::new(Config::default(), Arc::new(gateway))
    }

    #[tokio::test]
    async fn test_files_opened_activates_and_loads_first() {
        let mut app = app(FakeGateway::unreachable());
        let file = UploadedFile::new("people.csv", FileContent::Text("name\nJohn\n".into()));
        let file_id = file.id.clone();

        app.handle_event(AppEvent::FilesOpened {
            files: vec![file],
            errors: vec![],
        });
        assert_eq!(app.session.active_file_id(), Some(file_id.as_str()));
        assert!(app.loading_table);

        let table = TableData::from_delimited("name\nJohn\n", ',', 10).unwrap();
        app.handle_event(AppEvent::TableLoaded {
            file_id,
            result: Ok(table),
        });
        assert!(!app.loading_table);
        assert_eq!(app.session.preview().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_resolution_updates_history() {
        let mut app = app(FakeGateway::unreachable());
        app.session.add_files(vec![UploadedFile::new(
            "people.csv",
            FileContent::Text("a\n1\n".into()),
        )]);
        let ticket = app.session.begin_prompt("Summarize").unwrap();

        app.handle_event(AppEvent::PromptResolved {
            token: ticket.token,
            result: Err(AppError::Connectivity("refused".into())),
        });
        assert_eq!(app.backend, BackendStatus::Offline);
        assert_eq!(app.session.history()[0].status, PromptStatus::Failed);
    }

    #[tokio::test]
    async fn test_feedback_requires_answer() {
        let mut app = app(FakeGateway::default());
        app.session.add_files(vec![UploadedFile::new(
            "people.csv",
            FileContent::Text("a\n1\n".into()),
        )]);
        app.session.begin_prompt("Summarize").unwrap();

        app.handle_action(AppAction::Feedback(FeedbackKind::Positive));
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    fn type_and_submit(app: &mut App, text: &str) {
        app.input = TextArea::new(vec![text.to_string()]);
        app.handle_action(AppAction::Submit);
    }

    fn csv_file(name: &str) -> UploadedFile {
        UploadedFile::new(name, FileContent::Text("a\n1\n".into()))
    }

    #[test]
    fn test_suggestions_fill_input() {
        let mut app = app(FakeGateway::default());

        type_and_submit(&mut app, "/suggest 3");
        assert_eq!(app.input.lines(), [SUGGESTIONS[2]]);

        type_and_submit(&mut app, "/suggest");
        assert_eq!(app.view, View::Suggestions);
        app.handle_action(AppAction::Input(KeyEvent::new(
            KeyCode::Char('2'),
            KeyModifiers::NONE,
        )));
        assert_eq!(app.view, View::Main);
        assert_eq!(app.input.lines(), [SUGGESTIONS[1]]);

        type_and_submit(&mut app, "/suggest 9");
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Warning);
        assert_eq!(app.input.lines(), [""]);
    }

    #[test]
    fn test_toggle_suggestions_view() {
        let mut app = app(FakeGateway::default());
        app.handle_action(AppAction::ToggleSuggestions);
        assert_eq!(app.view, View::Suggestions);
        app.handle_action(AppAction::ToggleSuggestions);
        assert_eq!(app.view, View::Main);
    }

    #[test]
    fn test_quit_waits_for_pending_prompts() {
        let mut app = app(FakeGateway::default());
        app.session.add_files(vec![csv_file("people.csv")]);
        app.session.begin_prompt("Summarize").unwrap();

        app.handle_action(AppAction::Quit);
        assert!(!app.should_quit);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Warning);

        app.handle_action(AppAction::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_is_immediate_when_idle() {
        let mut app = app(FakeGateway::default());
        assert!(app.confirm_quit());
    }

    #[test]
    fn test_load_error_for_inactive_file_is_silent() {
        let mut app = app(FakeGateway::default());
        let ids = app
            .session
            .add_files(vec![csv_file("first.csv"), csv_file("second.csv")]);
        app.session.select_file(&ids[1]);

        app.handle_event(AppEvent::TableLoaded {
            file_id: ids[0].clone(),
            result: Err(AppError::Parse("bad".into())),
        });
        assert!(app.notice.is_none());
        assert!(matches!(app.session.table(), TableState::Loading));
    }

    #[test]
    fn test_answer_scroll_is_clamped_and_reset() {
        let mut app = app(FakeGateway::default());
        app.update_answer_scroll_bounds(30, 10);

        for _ in 0..5 {
            app.handle_action(AppAction::AnswerPageDown);
        }
        assert_eq!(app.answer_scroll, 20);
        app.handle_action(AppAction::AnswerPageUp);
        assert_eq!(app.answer_scroll, 15);

        app.update_answer_scroll_bounds(12, 10);
        assert_eq!(app.answer_scroll, 2);

        app.handle_action(AppAction::HistoryUp);
        assert_eq!(app.answer_scroll, 0);
    }
}
