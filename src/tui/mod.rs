//! Terminal User Interface for teamjobs
//!
//! An editable list of a team's jobs. It features:
//! - Inline name editing with per-row save spinners and success flashes
//! - A color picker popover per row
//! - A new-job draft row and live search
//! - Dual-channel event architecture (priority input, store results and ticks)
//! - Keyboard and mouse navigation

pub mod app;
pub mod event;
pub mod i18n;
pub mod runtime;
pub mod theme;
pub mod ui;

use std::io::{self, stdout, IsTerminal};
use std::sync::Arc;

use anyhow::{bail, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::models::AppConfig;
use crate::store::JobBackend;
use crate::tui::app::App;
use crate::tui::runtime::{
    create_channels, run_event_loop, spawn_animation_tick, spawn_input_task, spawn_store_worker,
    StoreRequest, TuiRuntime,
};

/// Terminal capability requirements for TUI mode
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub term_type: String,
    pub supports_alternate_screen: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let is_tty = stdout().is_terminal();
        let term_type = std::env::var("TERM").unwrap_or_default();
        Self::from_parts(is_tty, term_type)
    }

    fn from_parts(is_tty: bool, term_type: String) -> Self {
        // Known problematic terminals
        let supports_alternate_screen = !matches!(term_type.as_str(), "dumb" | "" | "unknown");
        Self {
            is_tty,
            term_type,
            supports_alternate_screen,
        }
    }

    /// Check if terminal is suitable for TUI mode
    pub fn is_suitable(&self) -> bool {
        self.is_tty && self.supports_alternate_screen
    }

    /// Get error message for unsuitable terminal
    pub fn error_message(&self) -> String {
        if !self.is_tty {
            "TUI mode requires an interactive terminal (stdout is not a TTY).\n\
             Hint: Use 'teamjobs list' or 'teamjobs add' instead."
                .to_string()
        } else if !self.supports_alternate_screen {
            format!(
                "Terminal type '{}' may not support TUI mode.\n\
                 Hint: Set TERM to a supported value (e.g., xterm-256color) or use CLI mode.",
                if self.term_type.is_empty() { "(unset)" } else { &self.term_type }
            )
        } else {
            "Unknown terminal capability issue.".to_string()
        }
    }
}

/// Run the TUI application
pub async fn run_tui(
    config: AppConfig,
    warnings: Vec<String>,
    backend: Arc<dyn JobBackend>,
) -> Result<()> {
    // Check terminal capabilities before attempting TUI mode
    let capabilities = TerminalCapabilities::detect();
    if !capabilities.is_suitable() {
        bail!("{}", capabilities.error_message());
    }

    let mut terminal = setup_terminal()?;

    let (store_tx, store_rx) = mpsc::unbounded_channel();
    let mut app = App::new(&config, warnings, store_tx.clone());
    if let Ok(size) = terminal.size() {
        app.set_viewport_height(size.height);
    }

    let (input_tx, input_rx, data_tx, data_rx) = create_channels();

    let mut runtime = TuiRuntime::new();

    // Spawn background tasks
    runtime.track(spawn_input_task(input_tx, runtime.cancel_token()));
    let store_worker = spawn_store_worker(backend, store_rx, data_tx.clone());
    runtime.track(spawn_animation_tick(
        data_tx,
        runtime.cancel_token(),
        app.animation_flag(),
    ));

    if store_tx.send(StoreRequest::Load).is_err() {
        tracing::warn!("Store worker exited before the initial load");
    }
    // The app now holds the only request sender
    drop(store_tx);

    let result = run_event_loop(app, input_rx, data_rx, |app| {
        terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    })
    .await;

    // The app was dropped with the loop, closing the request queue. Let the
    // worker finish every commit queued before quitting.
    if let Err(e) = store_worker.await {
        tracing::warn!("Store worker failed: {}", e);
    }

    // Shutdown background tasks
    runtime.shutdown().await;

    restore_terminal(&mut terminal)?;

    result
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI with the tokio runtime (entry point from main)
pub fn run(config: AppConfig, warnings: Vec<String>, backend: Arc<dyn JobBackend>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(config, warnings, backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dumb_terminal_unsuitable() {
        let caps = TerminalCapabilities::from_parts(true, "dumb".to_string());
        assert!(!caps.is_suitable());
        assert!(caps.error_message().contains("dumb"));

        let caps = TerminalCapabilities::from_parts(false, "xterm-256color".to_string());
        assert!(!caps.is_suitable());
        assert!(caps.error_message().contains("not a TTY"));

        assert!(TerminalCapabilities::from_parts(true, "xterm-256color".to_string()).is_suitable());
    }
}
