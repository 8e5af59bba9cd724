//! `years`: known first-issuance years and scheme counts.

use serde::Serialize;
use tabled::Tabled;

use idatlas_core::Explorer;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct YearCount {
    year: u16,
    schemes: usize,
}

#[derive(Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: u16,
    #[tabled(rename = "Schemes")]
    schemes: usize,
}

pub fn handle(explorer: &Explorer, global: &GlobalOpts) -> Result<(), CliError> {
    let store = explorer.store();
    if !store.years_enabled() {
        output::print_output(
            "year index unavailable; year filtering is disabled",
            global.quiet,
        );
        return Ok(());
    }

    let records = store.records();
    let counts: Vec<YearCount> = store
        .known_years()
        .into_iter()
        .map(|year| YearCount {
            year,
            schemes: records
                .iter()
                .filter(|record| store.year_of(&record.id) == Some(year))
                .count(),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &counts,
        |count| YearRow {
            year: count.year,
            schemes: count.schemes,
        },
        |count| count.year.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
