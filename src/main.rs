//! Staff intake TUI - terminal front end for registering personnel
//!
//! A Ratatui-based TUI that collects a personnel record through a modal
//! intake dialog and submits it to the intake API.

mod api;
mod app;
mod config;
mod intake;
mod platform;
mod state;
mod ui;

use anyhow::{Context, Result};
use api::{ApiClient, CachedReferenceData, PersonnelSubmissionService, ReferenceDataProvider};
use app::App;
use clap::Parser;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use intake::IntakeDriver;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "staff-intake-tui",
    about = "Register personnel through the intake API",
    version
)]
struct Cli {
    /// Base URL of the intake API
    #[arg(long, env = "INTAKE_API_URL")]
    api_url: Option<String>,
    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fetch reference data on every dialog opening
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => TuiConfig::load_from(path),
        None => TuiConfig::load(),
    };
    // A broken config file is reported inside the UI; defaults apply meanwhile
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (TuiConfig::default(), Some(format!("Could not read config: {e:#}"))),
    };

    init_logging(&config)?;
    if let Some(message) = &config_error {
        tracing::warn!("{}", message);
    }

    let base_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.api_base_url().to_string());
    let client = ApiClient::new(base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let api_url = client.base_url().to_string();

    let reference: Arc<dyn ReferenceDataProvider> =
        if config.cache_reference_data() && !cli.no_cache {
            Arc::new(CachedReferenceData::new(client.clone()))
        } else {
            Arc::new(client.clone())
        };
    let submissions: Arc<dyn PersonnelSubmissionService> = Arc::new(client);
    tracing::info!("Using intake API at {}", api_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(IntakeDriver::new(reference, submissions), api_url);
    if let Some(message) = config_error {
        app.push_error(message);
    }
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file so output never lands on the alternate screen
fn init_logging(config: &TuiConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "staff_intake_tui=info".into());

    // Without a home directory there is nowhere to log to
    let Some(path) = config.log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished background requests before drawing
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while a request is in flight so results show promptly
        let poll_duration = if app.state.intake.is_open() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Global quit: double Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    app.handle_ctrl_c();
                } else {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
