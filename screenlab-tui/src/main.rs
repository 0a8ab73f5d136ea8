//! ScreenLab TUI — terminal stock screener.
//!
//! Layout, top to bottom:
//! 1. Overview — ticker entry, company name, exchange/sector, description
//! 2. Metric cards — market cap, P/E, EPS, dividend yield
//! 3. Chart — price/volume or PE view with gap-collapsed time axis
//! 4. Statements — quarterly income statement table
//! 5. Status bar — key hints and notices

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use screenlab_core::config::ScreenerConfig;

use crate::app::AppState;
use crate::worker::WorkerCommand;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Configuration and state paths
    let config = ScreenerConfig::load_or_default(std::path::Path::new("screenlab.toml"))?;
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("screenlab")
        .join("state.json");

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));

    // Spawn worker
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, cancel.clone(), config.clone());

    // Build app state and apply persisted selections
    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        cancel,
        state_path.clone(),
        config.default_timeframe,
    );
    persistence::apply(&mut app, persistence::load(&state_path));

    // Kick off the initial render for the persisted ticker
    app.submit();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save selections before exit
    let _ = persistence::save(&state_path, &persistence::extract(&app));

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking); stale sequences are
        //    discarded inside apply_response.
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
