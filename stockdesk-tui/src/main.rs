//! StockDesk TUI — company list, metric cards, price/returns/data/summary tabs.
//!
//! Environment:
//! - `STOCKDESK_CONFIG`: TOML config path (default `stockdesk.toml`)
//! - `STOCKDESK_CSV_DIR`: read bars from `<dir>/<SYMBOL>.csv` instead of Yahoo
//! - `RUST_LOG`: log filter; logs go to `<config dir>/stockdesk/tui.log`

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use stockdesk_core::{AppConfig, Pipeline};
use stockdesk_tui::app::AppState;
use stockdesk_tui::worker::{self, WorkerCommand};
use stockdesk_tui::{input, persistence, ui};

fn main() -> Result<()> {
    // Paths
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockdesk");
    let state_path = app_dir.join("state.json");
    let config_path = std::env::var_os("STOCKDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("stockdesk.toml"));
    let csv_dir = std::env::var_os("STOCKDESK_CSV_DIR").map(PathBuf::from);

    init_logging(&app_dir.join("tui.log"))?;

    let config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let pipeline = Pipeline::from_config(&config, csv_dir.as_deref())?;
    pipeline.seed_directory(&config.directory())?;
    tracing::info!(
        provider = pipeline.provider_name(),
        db = %config.database_path.display(),
        "starting dashboard"
    );
    let pipeline = Arc::new(pipeline);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(pipeline, cmd_rx, resp_tx)?;

    let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, export_dir, state_path.clone());
    persistence::apply(&mut app, persisted);
    app.send(WorkerCommand::ListCompanies);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&app.state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "failed to save dashboard state");
    }

    // Shutdown worker; an in-flight fetch finishes first.
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

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
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

/// Log to a file; the terminal belongs to the dashboard.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
