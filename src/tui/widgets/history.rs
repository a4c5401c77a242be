//! History Widget
//!
//! Lists prompts for the active file and shows the selected answer.

use crate::models::PromptStatus;
use crate::tui::app::App;
use crate::tui::markdown::{answer_lines, strip_markdown, LineKind};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the prompt history for the active file
pub fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let items = app.session.history_for_active();

    let block = Block::default()
        .title(format!(" History ({}) ", items.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    if items.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No questions yet.",
            Theme::text_dim(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let list_items: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let icon = match item.status {
                PromptStatus::Pending => Icons::spinner(app.tick),
                PromptStatus::Answered => Icons::COMPLETE,
                PromptStatus::Failed => Icons::ERROR,
            };
            let mut spans = vec![
                Span::styled(format!("{} ", icon), Theme::status(item.status)),
                Span::styled(truncate(&item.prompt, width), Theme::prompt()),
            ];
            let feedback = Icons::feedback(item.feedback);
            if !feedback.is_empty() {
                spans.push(Span::raw(format!(" {}", feedback)));
            }

            let time = item
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string();
            let snippet = truncate(&strip_markdown(&item.answer), width.saturating_sub(10));
            ListItem::new(vec![
                Line::from(spans),
                Line::from(vec![
                    Span::styled(format!("  {} ", time), Theme::text_dim()),
                    Span::styled(snippet, Theme::text_secondary()),
                ]),
            ])
        })
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(Theme::selected())
        .highlight_symbol(Icons::SELECTED);

    let selected = app.history_cursor.min(items.len() - 1);
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the full answer of the selected history item
///
/// Also records the scroll bounds for PageUp/PageDown.
pub fn render_answer(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .title(" Answer ")
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);

    let lines = match app.selected_history() {
        Some(item) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Q: ", Theme::text_secondary()),
                    Span::styled(item.prompt.clone(), Theme::prompt()),
                ]),
                Line::from(""),
            ];
            if item.status == PromptStatus::Answered {
                lines.extend(markdown_lines(&item.answer));
            } else {
                let style = Theme::status(item.status);
                lines.extend(
                    item.answer
                        .lines()
                        .map(|l| Line::from(Span::styled(l.to_string(), style))),
                );
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Answers appear here.",
            Theme::text_dim(),
        ))],
    };

    let content_height: usize = lines
        .iter()
        .map(|line| wrapped_height(&line_text(line), inner.width as usize))
        .sum();
    app.update_answer_scroll_bounds(
        u16::try_from(content_height).unwrap_or(u16::MAX),
        inner.height,
    );

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn markdown_lines(answer: &str) -> Vec<Line<'static>> {
    answer_lines(answer)
        .into_iter()
        .map(|line| match line.kind {
            LineKind::Heading => Line::from(Span::styled(line.text, Theme::heading())),
            LineKind::Item(marker) => Line::from(vec![
                Span::raw(" ".repeat(line.indent)),
                Span::styled(format!("{} ", marker), Theme::shortcut_key()),
                Span::styled(line.text, Theme::text()),
            ]),
            LineKind::Quote => Line::from(vec![
                Span::styled("│ ", Theme::text_dim()),
                Span::styled(line.text, Theme::text_secondary()),
            ]),
            LineKind::Code => Line::from(Span::styled(format!("  {}", line.text), Theme::code())),
            LineKind::Text => Line::from(Span::styled(line.text, Theme::text())),
            LineKind::Blank => Line::from(""),
        })
        .collect()
}

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

/// Rows a line occupies once word-wrapped to `width` columns
fn wrapped_height(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let mut rows = 1;
    let mut current = 0;
    for word in text.split(' ') {
        let len = word.chars().count();
        if current == 0 {
            current = len;
        } else if current + 1 + len <= width {
            current += 1 + len;
        } else {
            rows += 1;
            current = len;
        }
        while current > width {
            rows += 1;
            current -= width;
        }
    }
    rows
}

/// Truncate a string to fit within a given width
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_width).collect()
    }
}
