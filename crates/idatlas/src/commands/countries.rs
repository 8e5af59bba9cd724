//! `countries`: region-grouped country aggregation.

use tabled::Tabled;

use idatlas_core::{Explorer, RegionGroup};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CountryRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Country")]
    name: String,
    #[tabled(rename = "LoA")]
    levels: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Schemes")]
    schemes: usize,
}

fn rows(groups: &[RegionGroup]) -> Vec<CountryRow> {
    groups
        .iter()
        .flat_map(|group| {
            group.countries.iter().map(|country| CountryRow {
                region: group.region.clone(),
                code: country.code.as_str().to_uppercase(),
                name: country.name.clone(),
                levels: output::join_or_dash(&country.levels),
                types: output::join_or_dash(&country.type_codes),
                schemes: country.scheme_count,
            })
        })
        .collect()
}

pub fn handle(explorer: &Explorer, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = explorer.snapshot();
    let groups = &snapshot.regions;

    // Grouped-into-flat rows don't fit the generic list renderer, so the
    // format dispatch is bespoke here; JSON keeps the nested grouping.
    let out = match &global.output {
        OutputFormat::Table => {
            tabled::Table::new(rows(groups))
                .with(tabled::settings::Style::rounded())
                .to_string()
        }
        OutputFormat::Json => output::render_json_pretty(groups),
        OutputFormat::JsonCompact => output::render_json_compact(groups),
        OutputFormat::Plain => groups
            .iter()
            .flat_map(|group| group.countries.iter().map(|c| c.code.to_string()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
