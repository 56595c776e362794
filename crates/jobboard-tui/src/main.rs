//! JobSeeker - a terminal client for the job board.
//!
//! Browse and post jobs, apply, track applications and keep a profile, all
//! from the keyboard. Protected views are only reachable while signed in.

mod app;
mod form;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobboard_core::api::ApiClient;
use jobboard_core::auth::{MemoryTokenStore, SessionStore, TokenStore};
use jobboard_core::config::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "jobboard.log";

const USAGE: &str = "\
Usage: jobboard [OPTIONS]

Options:
  --api-url <URL>  Backend base URL (default: http://localhost:8000/api/)
  --ephemeral      Keep the session in memory only
  -h, --help       Print help
  -V, --version    Print version

Environment:
  JOBBOARD_API_URL   Backend base URL
  JOBBOARD_USERNAME  Pre-filled login username
  RUST_LOG           Log filter (default: warn)";

/// Options taken from the command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    api_url: Option<String>,
    ephemeral: bool,
}

enum Command {
    Run(CliOptions),
    Help,
    Version,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--ephemeral" => options.ephemeral = true,
            "--api-url" => {
                let url = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--api-url requires a value"))?;
                options.api_url = Some(url);
            }
            other => {
                if let Some(url) = other.strip_prefix("--api-url=") {
                    options.api_url = Some(url.to_string());
                } else {
                    anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE);
                }
            }
        }
    }
    Ok(Command::Run(options))
}

/// Initialize the tracing subscriber for logging.
///
/// The terminal belongs to the UI, so logs go to a daily file in the cache
/// directory. Use RUST_LOG to control the level (e.g., RUST_LOG=debug).
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
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

    let options = match parse_args(std::env::args().skip(1))? {
        Command::Run(options) => options,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Version => {
            println!("jobboard {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let _log_guard = init_tracing(&config);
    info!("JobSeeker starting");
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    if let Ok(url) = std::env::var("JOBBOARD_API_URL") {
        config.api_base_url = Some(url);
    }
    if let Some(url) = options.api_url {
        config.api_base_url = Some(url);
    }
    if let Ok(username) = std::env::var("JOBBOARD_USERNAME") {
        config.last_username = Some(username);
    }

    let storage: Box<dyn TokenStore> = if options.ephemeral {
        Box::new(MemoryTokenStore::new())
    } else {
        config.token_store()?
    };
    let session = SessionStore::initialize(storage);
    let api = ApiClient::new(config.api_base_url())?;
    info!(base_url = %api.base_url(), "Using backend");

    let mut app = App::new(config, session, api);
    if options.ephemeral {
        app = app.without_config_persistence();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("JobSeeker shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // A logout or rejected token must hide protected views before drawing.
        app.enforce_guard();

        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
