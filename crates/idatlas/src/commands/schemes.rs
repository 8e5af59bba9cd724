//! `schemes`: filtered identity-scheme records.

use tabled::Tabled;

use idatlas_core::{Explorer, IdentityRecord};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SchemeRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    type_code: String,
    #[tabled(rename = "LoA")]
    levels: String,
    #[tabled(rename = "Flows")]
    flows: String,
    #[tabled(rename = "Countries")]
    countries: String,
}

impl From<&IdentityRecord> for SchemeRow {
    fn from(record: &IdentityRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            type_code: record
                .type_code
                .map_or_else(|| "-".to_string(), |code| code.to_string()),
            levels: output::join_or_dash(&record.levels),
            flows: output::join_or_dash(&record.flow_types),
            countries: record
                .countries
                .iter()
                .map(|code| code.as_str().to_uppercase())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub fn handle(explorer: &Explorer, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = explorer.snapshot();
    let out = output::render_list(
        &global.output,
        &snapshot.filtered,
        |record| SchemeRow::from(record.as_ref()),
        |record| record.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
