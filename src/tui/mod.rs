//! Category Terminal User Interface (TUI)
//!
//! Two screens, a validated entry form with spreadsheet upload and a table
//! with inline editing, switched through tabs.

pub mod app;
pub mod components;
pub mod events;
pub mod handlers;
pub mod operations;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Screen};
pub use events::AppEvent;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::CategoryApi;
use crate::config::Config;

/// Set up the terminal, run the app until quit, and restore the terminal
pub async fn run_tui(config: Config, api: Arc<dyn CategoryApi>, start: Screen) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api);
    app.start(start);

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => info!("Category TUI exited successfully"),
        Err(ref e) => error!("Category TUI encountered an error: {}", e),
    }
    result
}
