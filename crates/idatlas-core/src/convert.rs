// ── DTO → domain conversion ──
//
// Turns a parsed `idatlas_data::DataBundle` into the canonical
// `DatasetStore`, and offers the one-call bootstrap used by the CLI
// and TUI binaries.

use idatlas_data::{CountryDto, DataBundle, DataError, DataPaths, LoadReport, SchemeDto};
use tracing::debug;

use crate::explorer::{Explorer, ExplorerOptions};
use crate::model::{
    CountryCode, CountryDirectory, CountryInfo, IdentityRecord, RecordId, YearIndex,
};
use crate::store::DatasetStore;

impl From<SchemeDto> for IdentityRecord {
    fn from(dto: SchemeDto) -> Self {
        Self {
            id: RecordId::new(dto.id.into_string()),
            name: dto.name,
            logo: dto.logo_url,
            type_code: dto.scheme_type,
            levels: dto.loa,
            flow_types: dto.flow_types,
            scopes: dto.scopes,
            countries: dto.countries.iter().map(CountryCode::new).collect(),
            need_action: dto.need_action,
        }
    }
}

fn directory_from(countries: Option<Vec<CountryDto>>) -> CountryDirectory {
    match countries {
        Some(countries) => CountryDirectory::new(countries.into_iter().map(|dto| {
            (
                CountryCode::new(&dto.code),
                CountryInfo {
                    name: dto.name,
                    region: dto.region,
                },
            )
        })),
        None => CountryDirectory::empty(),
    }
}

/// Build the immutable dataset store from a parsed bundle.
pub fn build_store(bundle: DataBundle) -> DatasetStore {
    let records: Vec<IdentityRecord> =
        bundle.schemes.into_iter().map(IdentityRecord::from).collect();
    let directory = directory_from(bundle.countries);
    let years = bundle.years.map(|entries| {
        YearIndex::new(
            entries
                .into_iter()
                .map(|(id, year)| (RecordId::new(id), year)),
        )
    });

    debug!(
        records = records.len(),
        countries = directory.len(),
        years_enabled = years.is_some(),
        "dataset store built"
    );
    DatasetStore::new(records, directory, years)
}

/// Load the inputs and stand up a ready [`Explorer`].
///
/// The returned [`LoadReport`] carries the degradation flags the caller
/// needs for presentation decisions (hide the year control, announce the
/// single Unknown region bucket).
pub async fn load_explorer(
    paths: &DataPaths,
    options: ExplorerOptions,
) -> Result<(Explorer, LoadReport), DataError> {
    let (bundle, report) = idatlas_data::load_bundle(paths).await?;
    let store = build_store(bundle);
    Ok((Explorer::new(store, options), report))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bundle_converts_with_normalized_codes_and_ids() {
        let bundle: DataBundle = DataBundle {
            schemes: serde_json::from_str(
                r#"[{"id": 1, "name": "AlphaID", "type": 1, "loa": [2],
                     "countries": ["US", "fr"]}]"#,
            )
            .unwrap(),
            countries: serde_json::from_str(
                r#"[{"code": "FR", "name": "France", "region": "Europe"}]"#,
            )
            .map(Some)
            .unwrap(),
            years: Some(vec![("1".into(), 2010)]),
        };

        let store = build_store(bundle);
        assert_eq!(store.len(), 1);
        let records = store.records();
        let record = &records[0];
        assert_eq!(record.id.as_str(), "1");
        assert_eq!(
            record.countries,
            vec![CountryCode::new("us"), CountryCode::new("fr")]
        );
        // Directory keys normalized too.
        assert_eq!(store.directory().region_of(&CountryCode::new("fr")), "Europe");
        assert_eq!(store.year_of(&record.id), Some(2010));
        assert_eq!(store.known_years(), vec![2010]);
    }

    #[test]
    fn missing_supplements_degrade_the_store() {
        let bundle = DataBundle {
            schemes: serde_json::from_str(r#"[{"id": "x", "name": "Solo"}]"#).unwrap(),
            countries: None,
            years: None,
        };
        let store = build_store(bundle);
        assert!(store.directory().is_empty());
        assert!(!store.years_enabled());
        assert!(store.known_years().is_empty());
    }
}
