//! Theme and Styling
//!
//! Colors and styles for the terminal interface.

use ratatui::style::{Color, Modifier, Style};

use crate::models::{FeedbackKind, PromptStatus};
use crate::tabular::CellValue;

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (cyan/teal)
    pub const ACCENT: Color = Color::Rgb(0, 212, 255);

    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    /// Highlighted/selected background
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 38, 38);

    // === Border Colors ===

    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Cell Colors ===

    pub const NUMBER: Color = Color::Rgb(167, 139, 250);

    pub const DATE: Color = Color::Rgb(45, 212, 191);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Selected row in a list or table
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .bg(Self::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Prompt text in the history list
    pub fn prompt() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header row
    pub fn table_header() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Code block lines in answers
    pub fn code() -> Style {
        Style::default().fg(Self::DATE)
    }

    /// Style for a preview cell, by value type
    pub fn cell(value: &CellValue) -> Style {
        match value {
            CellValue::Empty => Self::text_dim(),
            CellValue::Number(_) => Style::default().fg(Self::NUMBER),
            CellValue::Date(_) => Style::default().fg(Self::DATE),
            CellValue::Text(_) => Self::text(),
        }
    }

    pub fn status(status: PromptStatus) -> Style {
        match status {
            PromptStatus::Pending => Self::active(),
            PromptStatus::Answered => Self::text(),
            PromptStatus::Failed => Self::error(),
        }
    }
}

/// Status icons
pub struct Icons;

impl Icons {
    pub const ONLINE: &'static str = "●";
    pub const OFFLINE: &'static str = "●";
    pub const UNKNOWN: &'static str = "○";
    pub const COMPLETE: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const SELECTED: &'static str = "▶";
    pub const THUMBS_UP: &'static str = "👍";
    pub const THUMBS_DOWN: &'static str = "👎";
    pub const SPINNER: [&'static str; 4] = ["◐", "◓", "◑", "◒"];

    pub fn feedback(kind: Option<FeedbackKind>) -> &'static str {
        match kind {
            Some(FeedbackKind::Positive) => Self::THUMBS_UP,
            Some(FeedbackKind::Negative) => Self::THUMBS_DOWN,
            None => "",
        }
    }

    pub fn spinner(tick: u64) -> &'static str {
        Self::SPINNER[(tick % Self::SPINNER.len() as u64) as usize]
    }
}
