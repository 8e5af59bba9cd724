// Shared test fixtures for the engine modules.

use crate::model::{CountryCode, CountryDirectory, CountryInfo, IdentityRecord, RecordId, YearIndex};
use crate::store::DatasetStore;

pub(crate) fn sample_records() -> Vec<IdentityRecord> {
    vec![
        IdentityRecord {
            id: RecordId::from(1u64),
            name: "AlphaID".into(),
            logo: Some("alpha.svg".into()),
            type_code: Some(1),
            levels: vec![2, 3],
            flow_types: vec!["redirect".into()],
            scopes: vec!["openid".into()],
            countries: vec![CountryCode::new("US"), CountryCode::new("FR")],
            need_action: Some(false),
        },
        IdentityRecord {
            id: RecordId::from(2u64),
            name: "BetaPass".into(),
            logo: None,
            type_code: Some(2),
            levels: vec![1],
            flow_types: vec!["app-to-app".into()],
            scopes: vec![],
            countries: vec![CountryCode::new("FR")],
            need_action: None,
        },
        // Deliberately gap-ridden: no type, no levels, no countries, no year.
        IdentityRecord {
            id: RecordId::from(3u64),
            name: "GammaSign".into(),
            logo: None,
            type_code: None,
            levels: vec![],
            flow_types: vec![],
            scopes: vec![],
            countries: vec![],
            need_action: None,
        },
    ]
}

pub(crate) fn sample_directory() -> CountryDirectory {
    CountryDirectory::new([
        (
            CountryCode::new("us"),
            CountryInfo {
                name: "United States".into(),
                region: "Americas".into(),
            },
        ),
        (
            CountryCode::new("fr"),
            CountryInfo {
                name: "France".into(),
                region: "Europe".into(),
            },
        ),
    ])
}

pub(crate) fn sample_years() -> YearIndex {
    YearIndex::new([(RecordId::from(1u64), 2010), (RecordId::from(2u64), 2015)])
}

pub(crate) fn sample_store() -> DatasetStore {
    DatasetStore::new(sample_records(), sample_directory(), Some(sample_years()))
}

/// Same dataset with the year index failed-to-load (dimension disabled).
pub(crate) fn sample_store_no_years() -> DatasetStore {
    DatasetStore::new(sample_records(), sample_directory(), None)
}

/// Same dataset with no country metadata (degraded directory).
pub(crate) fn sample_store_no_metadata() -> DatasetStore {
    DatasetStore::new(sample_records(), CountryDirectory::empty(), Some(sample_years()))
}
