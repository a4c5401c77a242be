//! TUI Widgets
//!
//! Custom widgets for the tabletalk TUI.

mod diagnostics;
mod history;
mod preview;

pub use diagnostics::render_diagnostics;
pub use history::{render_answer, render_history};
pub use preview::render_preview;
