//! `detail`: every matching scheme for one country.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use idatlas_core::{CountryCode, DetailEntry, DetailView, Explorer};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn render_entry(buf: &mut String, entry: &DetailEntry, color: bool) {
    if color {
        let _ = writeln!(buf, "{}", entry.name.bold());
    } else {
        let _ = writeln!(buf, "{}", entry.name);
    }
    let type_code = entry
        .type_code
        .map_or_else(|| "-".to_string(), |code| code.to_string());
    let year = entry
        .first_issued
        .map_or_else(|| "unknown".to_string(), |year| year.to_string());
    let action = entry.need_action.map_or("-", |need| if need { "yes" } else { "no" });
    let _ = writeln!(buf, "  Type:            {type_code}");
    let _ = writeln!(buf, "  LoA:             {}", output::join_or_dash(&entry.levels));
    let _ = writeln!(buf, "  Flows:           {}", output::join_or_dash(&entry.flow_types));
    let _ = writeln!(buf, "  Scopes:          {}", output::join_or_dash(&entry.scopes));
    let _ = writeln!(buf, "  Action required: {action}");
    let _ = writeln!(buf, "  First issued:    {year}");
}

fn render_detail(view: &DetailView, color: bool) -> String {
    match view {
        DetailView::NoSelection => "No country selected".to_string(),
        DetailView::Empty { name, code } => {
            format!("{name} ({}): no matching identities for current filters", code.display_fallback())
        }
        DetailView::Schemes { name, code, entries } => {
            let mut buf = String::new();
            let header = format!("{name} ({})", code.display_fallback());
            if color {
                let _ = writeln!(buf, "{}\n", header.bold().underline());
            } else {
                let _ = writeln!(buf, "{header}\n");
            }
            for entry in entries {
                render_entry(&mut buf, entry, color);
                buf.push('\n');
            }
            buf.trim_end().to_string()
        }
    }
}

pub fn handle(explorer: &Explorer, code: &str, global: &GlobalOpts) -> Result<(), CliError> {
    explorer.select_country(CountryCode::new(code));
    let snapshot = explorer.snapshot();
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &snapshot.detail,
        |view| render_detail(view, color),
        |view| match view {
            DetailView::Schemes { entries, .. } => entries
                .iter()
                .map(|entry| entry.name.clone())
                .collect::<Vec<_>>()
                .join("\n"),
            DetailView::Empty { .. } | DetailView::NoSelection => String::new(),
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
