//! Diagnostics Widget
//!
//! Modal listing the result of each endpoint check.

use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use crate::tui::ui::centered_rect;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the diagnostics modal
pub fn render_diagnostics(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("API URL: ", Theme::text_secondary()),
            Span::styled(app.config.api.base_url.clone(), Theme::text()),
        ]),
        Line::from(""),
    ];

    match &app.diagnostics {
        None => lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::spinner(app.tick)), Theme::active()),
            Span::styled("Running diagnostics...", Theme::text_secondary()),
        ])),
        Some(report) => {
            for check in &report.checks {
                let (icon, style) = if check.is_ok() {
                    (Icons::COMPLETE, Theme::success())
                } else {
                    (Icons::ERROR, Theme::error())
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", icon), style),
                    Span::styled(format!("{:<14}", check.endpoint), Theme::heading()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", check.detail),
                    Theme::text_secondary(),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Checked at {}", report.timestamp),
                Theme::text_dim(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Ctrl+D]", Theme::shortcut_key()),
        Span::styled(" Run again ", Theme::shortcut_desc()),
        Span::styled("[Esc]", Theme::shortcut_key()),
        Span::styled(" Close", Theme::shortcut_desc()),
    ]));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" API Diagnostics ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}
