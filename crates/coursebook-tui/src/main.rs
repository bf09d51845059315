//! Coursebook - a terminal client for the course catalog.
//!
//! Lists the catalog's beginner and advanced courses side by side and lets a
//! signed-in user edit them. Edits show up immediately; the backend is
//! updated in the background.

mod app;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use coursebook_core::config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "coursebook.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in the data directory since stderr belongs to the
/// terminal UI. Use RUST_LOG to control the level (e.g., RUST_LOG=debug).
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = match config.log_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {:#}", e);
        Config::default()
    });

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_tracing(&config);
    info!("Coursebook starting");

    // Create app before taking over the terminal so setup errors stay readable
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        warn!(error = %e, "Exited with error");
        eprintln!("Error: {}", e);
    }

    info!("Coursebook shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Let spawned store tasks make progress between frames
        tokio::task::yield_now().await;

        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
