//! HealthLens interactive Ratatui TUI
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  HealthLens  [F1] Disease Risk Prediction  [F2] Mental Health Support│
//!   ├─── active tab ──────────────────────────────────────────────────────┤
//!   │  F1: health parameter form, then the prediction result              │
//!   │  F2: MannMitra transcript, then the message input                   │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! Network calls run on a background tokio runtime. Their settlements come
//! back over a channel and are applied on the UI thread, so the screen keeps
//! redrawing while a request is pending. Logs go to a file because the
//! terminal is in raw mode.

mod app;
mod ui;

use std::{
    fs::OpenOptions,
    io,
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Mutex,
    },
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use healthlens_client::{http_services, ClientConfig};
use healthlens_contracts::error::HealthlensResult;
use healthlens_core::{
    driver::{Services, Settlement},
    effect::Effect,
};

use crate::app::App;

/// HealthLens terminal client.
#[derive(Parser)]
#[command(name = "healthlens-tui", about = "HealthLens risk prediction and MannMitra chat TUI")]
struct Cli {
    /// TOML client configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and HEALTHLENS_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Where to write logs while the TUI owns the terminal.
    #[arg(long, default_value = "healthlens-tui.log")]
    log_file: PathBuf,
}

fn build_services(cli: &Cli) -> HealthlensResult<Services> {
    let config = ClientConfig::load(cli.config.as_deref())?.with_api_url_override(cli.api_url.clone())?;
    info!(api_url = %config.api_url, "client configured");
    http_services(config)
}

// ── Effect dispatch ───────────────────────────────────────────────────────────

/// Run `effect` on the background runtime and post its settlement to `tx`.
fn dispatch(runtime: &Runtime, services: &Services, tx: &Sender<Settlement>, effect: Effect) {
    debug!(request_id = %effect.request_id(), "dispatching request");
    let services = services.clone();
    let tx = tx.clone();
    runtime.spawn(async move {
        let settlement = services.execute(effect).await;
        if tx.send(settlement).is_err() {
            debug!("ui closed before request settled");
        }
    });
}

fn drain_settlements(app: &mut App, rx: &Receiver<Settlement>) {
    while let Ok(settlement) = rx.try_recv() {
        app.apply(settlement);
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_file = OpenOptions::new().create(true).append(true).open(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();

    let services = match build_services(&cli) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let runtime = Runtime::new()?;
    let (tx, rx) = mpsc::channel::<Settlement>();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new();
    info!(
        prediction_session = %app.prediction.session_id(),
        chat_session = %app.chat.session_id(),
        "sessions started"
    );

    // Spinner tick interval.
    const TICK_MS: u64 = 120;
    let tick = Duration::from_millis(TICK_MS);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::ui(f, &app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(effect) = app.handle_key(key) {
                        dispatch(&runtime, &services, &tx, effect);
                    }
                }
            }
        }

        drain_settlements(&mut app, &rx);

        if last_tick.elapsed() >= tick {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    restore_terminal(&mut terminal)?;
    runtime.shutdown_background();
    Ok(())
}
