//! Event Handling
//!
//! Maps keyboard and timer events to application actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::models::FeedbackKind;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit without confirmation
    ForceQuit,
    /// Submit current input (Enter key)
    Submit,
    ToggleHelp,
    /// Escape - close modals
    Escape,
    /// Activate the next uploaded file (Tab)
    NextFile,
    /// Activate the previous uploaded file (Shift+Tab)
    PrevFile,
    HistoryUp,
    HistoryDown,
    /// Scroll the answer pane (PageUp/PageDown)
    AnswerPageUp,
    AnswerPageDown,
    /// Show or hide example questions
    ToggleSuggestions,
    /// Rate the selected answer
    Feedback(FeedbackKind),
    /// Copy the selected prompt back into the input
    Reuse,
    /// Cycle the preview row count
    CycleRows,
    /// Run endpoint diagnostics
    Diagnose,
    /// Regular input character
    Input(KeyEvent),
    /// Timer tick for animations
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }
}

fn map_event(event: Event) -> Option<AppAction> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key_event(key),
        _ => None,
    }
}

/// Map a key event to an app action
pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(AppAction::Reuse),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(AppAction::CycleRows),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(AppAction::Diagnose),

        (KeyModifiers::SHIFT, KeyCode::BackTab) => Some(AppAction::PrevFile),

        (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc => Some(AppAction::Escape),
            KeyCode::Enter => Some(AppAction::Submit),
            KeyCode::F(1) => Some(AppAction::ToggleHelp),
            KeyCode::F(2) => Some(AppAction::Feedback(FeedbackKind::Positive)),
            KeyCode::F(3) => Some(AppAction::Feedback(FeedbackKind::Negative)),
            KeyCode::F(4) => Some(AppAction::ToggleSuggestions),
            KeyCode::PageUp => Some(AppAction::AnswerPageUp),
            KeyCode::PageDown => Some(AppAction::AnswerPageDown),
            KeyCode::Up => Some(AppAction::HistoryUp),
            KeyCode::Down => Some(AppAction::HistoryDown),
            KeyCode::Tab => Some(AppAction::NextFile),
            KeyCode::BackTab => Some(AppAction::PrevFile),
            _ => Some(AppAction::Input(key)),
        },

        _ => Some(AppAction::Input(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('u'))),
            Some(AppAction::Reuse)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::F(3))),
            Some(AppAction::Feedback(FeedbackKind::Negative))
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::SHIFT, KeyCode::BackTab)),
            Some(AppAction::PrevFile)
        );
    }

    #[test]
    fn test_answer_paging_and_suggestions() {
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::PageDown)),
            Some(AppAction::AnswerPageDown)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::PageUp)),
            Some(AppAction::AnswerPageUp)
        );
        assert_eq!(
            map_key_event(key(KeyModifiers::NONE, KeyCode::F(4))),
            Some(AppAction::ToggleSuggestions)
        );
    }

    #[tokio::test]
    async fn test_next_waits_for_an_action() {
        let (tx, rx) = mpsc::channel(4);
        let mut handler = EventHandler { rx, _tx: tx.clone() };

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(AppAction::Tick).await.ok();
        });
        assert_eq!(handler.next().await, Some(AppAction::Tick));
    }

    #[test]
    fn test_plain_characters_are_input() {
        let k = key(KeyModifiers::SHIFT, KeyCode::Char('S'));
        assert_eq!(map_key_event(k), Some(AppAction::Input(k)));
    }
}
