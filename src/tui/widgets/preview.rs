//! Preview Widget
//!
//! Renders the first rows of the active file as a table.

use crate::session::TableState;
use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

const MIN_COLUMN_WIDTH: u16 = 6;
const MAX_COLUMN_WIDTH: u16 = 24;

/// Render the data preview panel
pub fn render_preview(frame: &mut Frame, area: Rect, app: &App) {
    let title = match (app.session.active_file(), app.session.table()) {
        (Some(file), TableState::Ready(table)) => format!(
            " Preview: {} ({} of {} rows) ",
            file.name,
            app.session.preview().len(),
            table.row_count()
        ),
        (Some(file), _) => format!(" Preview: {} ", file.name),
        (None, _) => " Preview ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = match app.session.table() {
        TableState::Ready(table) if table.headers.is_empty() => {
            Some(Line::from(Span::styled("The file has no columns.", Theme::text_dim())))
        }
        TableState::Ready(_) => None,
        TableState::Loading => Some(Line::from(vec![
            Span::styled(format!("{} ", Icons::spinner(app.tick)), Theme::active()),
            Span::styled("Processing file...", Theme::text_secondary()),
        ])),
        TableState::Unavailable(reason) => {
            Some(Line::from(Span::styled(reason.clone(), Theme::error())))
        }
        TableState::Empty => Some(Line::from(Span::styled(
            "No file selected. Type /open <path> to upload a CSV or Excel file.",
            Theme::text_dim(),
        ))),
    };

    if let Some(line) = message {
        let paragraph = Paragraph::new(line).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        return;
    }

    let TableState::Ready(table) = app.session.table() else {
        return;
    };
    let rows = app.session.preview();

    let widths: Vec<Constraint> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let longest = rows
                .iter()
                .map(|row| row.get(header).to_string().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            let width = (longest as u16).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            // Last column takes the remaining space
            if i + 1 == table.headers.len() {
                Constraint::Min(width)
            } else {
                Constraint::Length(width)
            }
        })
        .collect();

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.as_str()).style(Theme::table_header())),
    );

    let body = rows.iter().map(|row| {
        Row::new(table.headers.iter().map(|h| {
            let value = row.get(h);
            Cell::from(value.to_string()).style(Theme::cell(value))
        }))
    });

    let widget = Table::new(body, widths).header(header).column_spacing(2);
    frame.render_widget(widget, inner);
}
