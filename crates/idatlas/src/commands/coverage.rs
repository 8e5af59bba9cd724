//! `coverage`: the (scheme, country) support-pair counter.

use owo_colors::OwoColorize;
use serde::Serialize;

use idatlas_core::Explorer;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Coverage {
    coverage: usize,
}

pub fn handle(explorer: &Explorer, global: &GlobalOpts) -> Result<(), CliError> {
    let count = explorer.snapshot().counter;
    let noun = if count == 1 {
        "digital identity"
    } else {
        "digital identities"
    };

    let out = match &global.output {
        OutputFormat::Table => {
            if output::should_color(&global.color) {
                format!("{} supported {noun}", count.bold())
            } else {
                format!("{count} supported {noun}")
            }
        }
        OutputFormat::Json => output::render_json_pretty(&Coverage { coverage: count }),
        OutputFormat::JsonCompact => output::render_json_compact(&Coverage { coverage: count }),
        OutputFormat::Plain => count.to_string(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
