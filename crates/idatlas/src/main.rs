//! `idatlas` CLI entry point.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use idatlas_core::{ChangeOrigin, Explorer, ExplorerOptions};
use idatlas_data::DataPaths;

use crate::cli::{Cli, Command, FilterOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Config management needs no dataset.
    if let Command::Config(args) = &cli.command {
        return commands::config_cmd::handle(&args.command, &cli.global);
    }

    let config = idatlas_config::load_config(cli.global.config.as_ref())?;
    let paths = cli
        .global
        .data_dir
        .as_ref()
        .map_or_else(|| config.data_paths(), DataPaths::in_dir);

    let options = ExplorerOptions {
        playback_interval: config.playback_interval(),
    };
    let (explorer, report) = idatlas_core::load_explorer(&paths, options).await?;
    tracing::debug!(schemes = report.scheme_count, "dataset loaded");

    if !cli.global.quiet {
        for warning in &report.warnings {
            eprintln!("warning: {warning}");
        }
    }

    if let Some(filter) = filter_of(&cli.command) {
        apply_filters(&explorer, filter)?;
    }

    match &cli.command {
        Command::Countries(_) => commands::countries::handle(&explorer, &cli.global),
        Command::Schemes(_) => commands::schemes::handle(&explorer, &cli.global),
        Command::Detail(args) => commands::detail::handle(&explorer, &args.code, &cli.global),
        Command::Coverage(_) => commands::coverage::handle(&explorer, &cli.global),
        Command::Years => commands::years::handle(&explorer, &cli.global),
        Command::Config(args) => commands::config_cmd::handle(&args.command, &cli.global),
    }
}

fn filter_of(command: &Command) -> Option<&FilterOpts> {
    match command {
        Command::Countries(args) => Some(&args.filter),
        Command::Schemes(args) => Some(&args.filter),
        Command::Detail(args) => Some(&args.filter),
        Command::Coverage(args) => Some(&args.filter),
        Command::Years | Command::Config(_) => None,
    }
}

/// Translate the filter flags into Explorer state. `--year` against a
/// dataset whose year index failed to load is a hard flag error rather
/// than the silent no-op the interactive UI gets away with.
fn apply_filters(explorer: &Explorer, filter: &FilterOpts) -> Result<(), CliError> {
    explorer.set_levels(filter.levels.iter().copied().collect());
    explorer.set_type_codes(filter.type_codes.iter().copied().collect());
    explorer.set_regions(filter.regions.iter().cloned().collect());

    if let Some(year) = filter.year {
        if !explorer.store().years_enabled() {
            return Err(CliError::Validation {
                field: "year".into(),
                reason: "year index failed to load; year filtering is unavailable".into(),
            });
        }
        explorer.set_year_cutoff(Some(year), ChangeOrigin::User);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
