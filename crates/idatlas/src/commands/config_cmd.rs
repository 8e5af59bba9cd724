//! `config`: inspect or create the configuration file.

use std::fmt::Write as _;
use std::path::PathBuf;

use idatlas_config::{Config, config_path, load_config, save_config};

use crate::cli::{ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// The file `init` and `path` target: the `--config` override when
/// given, otherwise the platform path.
fn target_path(global: &GlobalOpts) -> Result<PathBuf, CliError> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => Ok(config_path()?),
    }
}

/// Resolved key = value listing, data paths fully expanded.
fn render_config(config: &Config) -> String {
    let mut out = String::new();
    let paths = config.data_paths();
    let _ = writeln!(out, "data.schemes         = {}", paths.schemes.display());
    let _ = writeln!(out, "data.countries       = {}", paths.countries.display());
    let _ = writeln!(out, "data.years           = {}", paths.years.display());
    let _ = write!(out, "playback.interval_ms = {}", config.playback.interval_ms);
    out
}

pub fn handle(command: &ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        ConfigCommand::Init { force } => {
            let path = target_path(global)?;
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "{} already exists; pass --force to overwrite",
                        path.display()
                    ),
                });
            }
            let written = save_config(&Config::default(), Some(&path))?;
            output::print_output(&format!("wrote {}", written.display()), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let config = load_config(global.config.as_ref())?;
            let out = output::render_single(&global.output, &config, render_config, render_config);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = target_path(global)?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
