//! Terminal User Interface Module
//!
//! Interactive front end for the analysis service, built with Ratatui.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  tabletalk Spreadsheet Analysis          ● online  <api url>    │
//! ├──────────────────┬──────────────────────────────────────────────┤
//! │ Files            │ Preview: sales.csv (10 of 500 rows)          │
//! │ ▶ sales.csv      │  region   month       revenue                │
//! │   q3.xlsx        │  EU       2024-01-01  1200                   │
//! ├──────────────────┼──────────────────────────────────────────────┤
//! │ History (2)      │ Answer                                       │
//! │ ✓ Summarize      │  Q: Summarize                                │
//! │ ◐ Top region?    │  The data covers ...                         │
//! ├──────────────────┴──────────────────────────────────────────────┤
//! │ Ask: > What is the average revenue?                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod markdown;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, View};
pub use event::{AppAction, EventHandler};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::gateway::AnalysisGateway;

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(
    config: Config,
    gateway: Arc<dyn AnalysisGateway>,
    files: Vec<PathBuf>,
) -> anyhow::Result<()> {
    info!(api_url = %config.api.base_url, "Starting TUI mode");

    let mut terminal = init_terminal()?;

    let mut app = App::new(config, gateway);
    app.start(files);

    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Ticks arrive every tick_rate, so this wakes often enough to
        // pick up background completions
        let Some(action) = events.next().await else {
            break;
        };
        match action {
            AppAction::Quit => {
                if app.confirm_quit() {
                    break;
                }
            }
            AppAction::ForceQuit => break,
            _ => app.handle_action(action),
        }

        // Apply completions from background requests
        app.poll_events();

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
