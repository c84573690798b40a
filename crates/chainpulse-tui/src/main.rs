//! `chainpulse` — Terminal dashboard for simulated blockchain network health.
//!
//! Built on [ratatui](https://ratatui.rs) with data from
//! `chainpulse-core`'s [`RefreshController`](chainpulse_core::RefreshController):
//! summary cards with percent-change trends plus a time-series chart, for a
//! selectable network and timeframe, refreshed periodically.
//!
//! Logs are written to a file (default `/tmp/chainpulse.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams fetch
//! state transitions from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chainpulse_core::{Network, RefreshController, SimulatedSource, Timeframe};

use crate::app::App;

/// Terminal dashboard for simulated blockchain network health metrics.
#[derive(Parser, Debug)]
#[command(name = "chainpulse", version, about)]
struct Cli {
    /// Network shown on startup (bitcoin, ethereum, solana, polygon, avalanche)
    #[arg(short, long)]
    network: Option<String>,

    /// Timeframe shown on startup (1h, 24h, 7d, 30d)
    #[arg(short, long)]
    timeframe: Option<String>,

    /// Periodic refresh interval in seconds; 0 disables the timer
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// Log file path (defaults to /tmp/chainpulse.log)
    #[arg(long, default_value = "/tmp/chainpulse.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("chainpulse={log_level},chainpulse_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("chainpulse.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Config file + env, then CLI flag overrides on top.
    let config = chainpulse_config::load_config().wrap_err("loading configuration")?;
    let mut refresh = chainpulse_config::to_refresh_config(&config)?;
    let mut selection = chainpulse_config::initial_selection(&config);

    if let Some(ref name) = cli.network {
        selection.network = Network::from_str(name)
            .map_err(|_| eyre!("unknown network '{name}' (try: bitcoin, ethereum, solana, polygon, avalanche)"))?;
    }
    if let Some(ref name) = cli.timeframe {
        selection.timeframe = Timeframe::from_str(name)
            .map_err(|_| eyre!("unknown timeframe '{name}' (try: 1h, 24h, 7d, 30d)"))?;
    }
    if let Some(secs) = cli.refresh_interval {
        refresh.refresh_interval = Duration::from_secs(secs);
    }

    info!(
        network = %selection.network,
        timeframe = %selection.timeframe,
        refresh_secs = refresh.refresh_interval.as_secs(),
        "starting chainpulse"
    );

    let source = SimulatedSource::new(&refresh);
    let controller = RefreshController::new(source, refresh, selection)?;

    let mut app = App::new(controller, selection);
    app.run().await?;

    Ok(())
}
