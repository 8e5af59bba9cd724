//! `idatlas-tui`: terminal explorer for digital-identity scheme support
//! per country.
//!
//! Built on [ratatui](https://ratatui.rs) over the `idatlas-core`
//! [`Explorer`](idatlas_core::Explorer). Screens are navigable via number
//! keys (1-3): Map, Schemes, and Filters.
//!
//! Logs are written to a file (default `/tmp/idatlas-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! every published view snapshot into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use idatlas_core::ExplorerOptions;
use idatlas_data::DataPaths;

use crate::app::App;

/// Terminal explorer for digital-identity scheme support per country.
#[derive(Parser, Debug)]
#[command(name = "idatlas-tui", version, about)]
struct Cli {
    /// Configuration file (defaults to the platform config path)
    #[arg(long, env = "IDATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding schemes.json, countries.json, and years.json
    #[arg(short = 'd', long, env = "IDATLAS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log file path (defaults to /tmp/idatlas-tui.log)
    #[arg(long, default_value = "/tmp/idatlas-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr; that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("idatlas_tui={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("idatlas-tui.log"));

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

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = idatlas_config::load_config(cli.config.as_ref())
        .map_err(|e| eyre!("failed to load configuration: {e}"))?;
    let paths = cli
        .data_dir
        .as_ref()
        .map_or_else(|| config.data_paths(), DataPaths::in_dir);

    let options = ExplorerOptions {
        playback_interval: config.playback_interval(),
    };
    let (explorer, report) = idatlas_core::load_explorer(&paths, options)
        .await
        .map_err(|e| eyre!("failed to load the dataset: {e}"))?;

    info!(
        schemes = report.scheme_count,
        countries_degraded = report.countries_degraded,
        years_disabled = report.years_disabled,
        "starting idatlas-tui"
    );

    let mut app = App::new(explorer);
    app.run().await?;

    Ok(())
}
