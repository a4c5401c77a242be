//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, BackendStatus, NoticeLevel, View, SUGGESTIONS};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_body(frame, chunks[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.view {
        View::Help => render_help(frame),
        View::Diagnostics => widgets::render_diagnostics(frame, app),
        View::Suggestions => render_suggestions(frame),
        View::Main => {}
    }
}

/// Render the header with the backend status indicator
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let status = match app.backend {
        BackendStatus::Online => {
            Span::styled(format!("{} online", Icons::ONLINE), Theme::success())
        }
        BackendStatus::Offline => {
            Span::styled(format!("{} offline", Icons::OFFLINE), Theme::error())
        }
        BackendStatus::Unknown => {
            Span::styled(format!("{} checking", Icons::UNKNOWN), Theme::text_dim())
        }
    };

    let title = Paragraph::new(Line::from(vec![
        Span::styled("tabletalk", Theme::title()),
        Span::styled(" Spreadsheet Analysis", Theme::text_secondary()),
        Span::raw("  "),
        status,
        Span::styled(format!("  {}", app.config.api.base_url), Theme::text_dim()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let file_rows = (app.session.files().len() as u16).clamp(1, 8) + 2;
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(file_rows), Constraint::Min(5)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    render_files(frame, left[0], app);
    widgets::render_history(frame, left[1], app);
    widgets::render_preview(frame, right[0], app);
    widgets::render_answer(frame, right[1], app);
}

/// Render the uploaded file list
fn render_files(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let active = app.session.active_file_id();
    let items: Vec<ListItem> = app
        .session
        .files()
        .iter()
        .map(|file| {
            let is_active = Some(file.id.as_str()) == active;
            let prefix = if is_active { Icons::SELECTED } else { " " };
            let style = if is_active {
                Theme::selected()
            } else {
                Theme::text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", prefix), style),
                Span::styled(file.name.clone(), style),
            ]))
        })
        .collect();

    if items.is_empty() {
        let paragraph =
            Paragraph::new(Span::styled("/open <path>", Theme::text_dim())).block(block);
        frame.render_widget(paragraph, area);
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Ask ")
        .borders(Borders::ALL)
        .border_style(if app.view == View::Main {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.input, inner);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let pending = app.session.pending_count();
    let status = if pending > 0 {
        Span::styled(
            format!("{} Processing {} prompt(s)...", Icons::spinner(app.tick), pending),
            Theme::active(),
        )
    } else if let Some(notice) = &app.notice {
        let style = match notice.level {
            NoticeLevel::Info => Theme::text_secondary(),
            NoticeLevel::Warning => Theme::warning(),
            NoticeLevel::Error => Theme::error(),
        };
        Span::styled(notice.text.clone(), style)
    } else {
        Span::styled("Ready", Theme::text_secondary())
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Ask ", Theme::shortcut_desc()),
        Span::styled("[Tab]", Theme::shortcut_key()),
        Span::styled(" File ", Theme::shortcut_desc()),
        Span::styled(
            format!("[Ctrl+R] {} rows ", app.session.preview_rows()),
            Theme::shortcut_desc(),
        ),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let shortcut = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<16}", key), Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        shortcut("Enter", "Ask the question / run command"),
        shortcut("Tab / Shift+Tab", "Switch uploaded file"),
        shortcut("↑/↓", "Select history item"),
        shortcut("F2 / F3", "Rate selected answer up / down"),
        shortcut("F4", "Show example questions"),
        shortcut("PgUp/PgDn", "Scroll the answer"),
        shortcut("Ctrl+U", "Reuse selected prompt"),
        shortcut("Ctrl+R", "Cycle preview rows"),
        shortcut("Ctrl+D", "Run API diagnostics"),
        shortcut("Ctrl+Q", "Quit application"),
        shortcut("Esc", "Close modal"),
        Line::from(""),
        Line::from(Span::styled("Commands", Theme::heading())),
        Line::from(""),
        shortcut("/open <paths>", "Upload CSV or Excel files"),
        shortcut("/rows [n]", "Preview 5, 10, 20, 50 or 100 rows"),
        shortcut("/export <path>", "Save the preview as CSV"),
        shortcut("/diagnose", "Check every API endpoint"),
        shortcut("/suggest [n]", "List or use an example question"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Render the example question picker
fn render_suggestions(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Example questions you can ask:",
            Theme::text_secondary(),
        )),
        Line::from(""),
    ];
    lines.extend(SUGGESTIONS.iter().enumerate().map(|(i, text)| {
        Line::from(vec![
            Span::styled(format!(" {}  ", i + 1), Theme::shortcut_key()),
            Span::styled(*text, Theme::text()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press 1-8 to use one, any other key to close",
        Theme::text_dim(),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Suggestions ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
