// ── Derived view-models ──
//
// Four independent pure computations over the FilteredSet: the active
// country set for map coloring, the region-grouped aggregation for the
// list panel, the support-pair counter, and the detail view for the
// selected country. None of these are stored as authoritative state;
// they are recomputed whole on every change.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use strum::Display;

use crate::filter::country_in_regions;
use crate::model::{CountryCode, IdentityRecord};
use crate::store::DatasetStore;

/// Tri-state map styling for a country.
///
/// `Selected` takes visual precedence over `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CountryStyle {
    Selected,
    Active,
    Inactive,
}

/// Per-country rollup of the filtered records listing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryAggregate {
    pub code: CountryCode,
    pub name: String,
    /// Union of assurance levels across qualifying records, ascending.
    pub levels: Vec<u8>,
    /// Union of type codes across qualifying records, ascending.
    pub type_codes: Vec<u32>,
    /// Number of qualifying records.
    pub scheme_count: usize,
}

/// One region bucket of the aggregation, countries sorted by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionGroup {
    pub region: String,
    pub countries: Vec<CountryAggregate>,
}

/// One scheme entry in the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailEntry {
    pub name: String,
    pub logo: Option<String>,
    pub type_code: Option<u32>,
    pub levels: Vec<u8>,
    pub flow_types: Vec<String>,
    pub scopes: Vec<String>,
    pub need_action: Option<bool>,
    /// First-issuance year; `None` renders as "unknown".
    pub first_issued: Option<u16>,
}

/// Detail panel view-model.
///
/// "No matching schemes for the current filters" is deliberately distinct
/// from "no country selected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailView {
    NoSelection,
    Empty {
        code: CountryCode,
        name: String,
    },
    Schemes {
        code: CountryCode,
        name: String,
        entries: Vec<DetailEntry>,
    },
}

/// Countries eligible for "active" map styling.
///
/// A country appears iff it is listed by some filtered record AND its own
/// resolved region passes the region dimension. The per-country check is
/// stricter than the record-level OR test: a US+FR record filtered to
/// Europe keeps the record but activates only FR.
pub fn active_countries(
    store: &DatasetStore,
    filtered: &[Arc<IdentityRecord>],
    regions: &BTreeSet<String>,
) -> BTreeSet<CountryCode> {
    filtered
        .iter()
        .flat_map(|record| record.countries.iter())
        .filter(|code| country_in_regions(store, regions, code))
        .cloned()
        .collect()
}

/// Sum of per-record country list lengths; "(record, country) support
/// pairs", duplicates across records counted separately.
pub fn counter(filtered: &[Arc<IdentityRecord>]) -> usize {
    filtered.iter().map(|record| record.countries.len()).sum()
}

/// Region-grouped country aggregation for the list panel.
///
/// Regions sorted alphabetically by label, countries within a region by
/// display name, per-country level/type unions ascending. Countries with
/// zero qualifying records are omitted (they never enter the map).
pub fn aggregate_by_region(
    store: &DatasetStore,
    filtered: &[Arc<IdentityRecord>],
    regions: &BTreeSet<String>,
) -> Vec<RegionGroup> {
    struct Rollup {
        levels: BTreeSet<u8>,
        type_codes: BTreeSet<u32>,
        scheme_count: usize,
    }

    let mut per_country: BTreeMap<CountryCode, Rollup> = BTreeMap::new();
    for record in filtered {
        for code in &record.countries {
            if !country_in_regions(store, regions, code) {
                continue;
            }
            let rollup = per_country.entry(code.clone()).or_insert_with(|| Rollup {
                levels: BTreeSet::new(),
                type_codes: BTreeSet::new(),
                scheme_count: 0,
            });
            rollup.levels.extend(record.levels.iter().copied());
            if let Some(type_code) = record.type_code {
                rollup.type_codes.insert(type_code);
            }
            rollup.scheme_count += 1;
        }
    }

    let mut by_region: BTreeMap<String, Vec<CountryAggregate>> = BTreeMap::new();
    for (code, rollup) in per_country {
        let resolved = store.directory().resolve(&code);
        by_region
            .entry(resolved.region)
            .or_default()
            .push(CountryAggregate {
                code,
                name: resolved.name,
                levels: rollup.levels.into_iter().collect(),
                type_codes: rollup.type_codes.into_iter().collect(),
                scheme_count: rollup.scheme_count,
            });
    }

    by_region
        .into_iter()
        .map(|(region, mut countries)| {
            countries.sort_by(|a, b| a.name.cmp(&b.name));
            RegionGroup { region, countries }
        })
        .collect()
}

/// Detail view for the selected country, or `NoSelection`.
pub fn detail_view(
    store: &DatasetStore,
    filtered: &[Arc<IdentityRecord>],
    selected: Option<&CountryCode>,
) -> DetailView {
    let Some(code) = selected else {
        return DetailView::NoSelection;
    };
    let name = store.directory().resolve(code).name;

    let entries: Vec<DetailEntry> = filtered
        .iter()
        .filter(|record| record.supports_country(code))
        .map(|record| DetailEntry {
            name: record.name.clone(),
            logo: record.logo.clone(),
            type_code: record.type_code,
            levels: record.levels.clone(),
            flow_types: record.flow_types.clone(),
            scopes: record.scopes.clone(),
            need_action: record.need_action,
            first_issued: store.year_of(&record.id),
        })
        .collect();

    if entries.is_empty() {
        DetailView::Empty {
            code: code.clone(),
            name,
        }
    } else {
        DetailView::Schemes {
            code: code.clone(),
            name,
            entries,
        }
    }
}

/// Comma-join display-able values, or the placeholder when the slice is
/// empty. The CLI and TUI renderers pick their own placeholder glyph.
pub fn join_or<T: std::fmt::Display>(values: &[T], empty: &str) -> String {
    if values.is_empty() {
        empty.to_string()
    } else {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tri-state style lookup for map rendering.
pub fn country_style(
    active: &BTreeSet<CountryCode>,
    selected: Option<&CountryCode>,
    code: &CountryCode,
) -> CountryStyle {
    if selected == Some(code) {
        CountryStyle::Selected
    } else if active.contains(code) {
        CountryStyle::Active
    } else {
        CountryStyle::Inactive
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filter::{self, FilterState};
    use crate::testutil::{sample_store, sample_store_no_metadata};
    use crate::model::UNKNOWN_REGION;

    fn codes(set: &BTreeSet<CountryCode>) -> Vec<&str> {
        set.iter().map(CountryCode::as_str).collect()
    }

    #[test]
    fn unrestricted_scenario_matches_reference_numbers() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());

        assert_eq!(filtered.len(), 3);
        assert_eq!(counter(&filtered), 3); // 2 + 1 + 0 support pairs
        let active = active_countries(&store, &filtered, &BTreeSet::new());
        assert_eq!(codes(&active), vec!["fr", "us"]);
    }

    #[test]
    fn region_filter_narrows_active_set_but_not_records() {
        let store = sample_store();
        let regions = BTreeSet::from(["Europe".to_string()]);
        let state = FilterState {
            regions: regions.clone(),
            ..FilterState::default()
        };
        let filtered = filter::apply(&store, &state);

        // Both country-bearing records survive the record-level OR test...
        assert_eq!(filtered.len(), 2);
        // ...but only FR is eligible for active styling.
        let active = active_countries(&store, &filtered, &regions);
        assert_eq!(codes(&active), vec!["fr"]);

        let groups = aggregate_by_region(&store, &filtered, &regions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].region, "Europe");
        assert_eq!(groups[0].countries.len(), 1);
        let fr = &groups[0].countries[0];
        assert_eq!(fr.code.as_str(), "fr");
        assert_eq!(fr.name, "France");
        assert_eq!(fr.levels, vec![1, 2, 3]);
        assert_eq!(fr.type_codes, vec![1, 2]);
        assert_eq!(fr.scheme_count, 2);
    }

    #[test]
    fn type_filter_scenario() {
        let store = sample_store();
        let state = FilterState {
            type_codes: BTreeSet::from([2]),
            ..FilterState::default()
        };
        let filtered = filter::apply(&store, &state);
        assert_eq!(filtered.len(), 1);
        assert_eq!(counter(&filtered), 1);
        let active = active_countries(&store, &filtered, &BTreeSet::new());
        assert_eq!(codes(&active), vec!["fr"]);
    }

    #[test]
    fn active_set_is_subset_of_filtered_countries() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());
        let all: BTreeSet<CountryCode> = filtered
            .iter()
            .flat_map(|r| r.countries.iter().cloned())
            .collect();

        // Unrestricted region dimension: equality holds.
        let active = active_countries(&store, &filtered, &BTreeSet::new());
        assert_eq!(active, all);

        // Restricted: strict subset relationship.
        let regions = BTreeSet::from(["Americas".to_string()]);
        let narrowed = active_countries(&store, &filtered, &regions);
        assert!(narrowed.is_subset(&all));
    }

    #[test]
    fn aggregation_partitions_active_set_exactly() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());
        let regions = BTreeSet::new();
        let active = active_countries(&store, &filtered, &regions);
        let groups = aggregate_by_region(&store, &filtered, &regions);

        let mut seen = BTreeSet::new();
        for group in &groups {
            for country in &group.countries {
                assert!(seen.insert(country.code.clone()), "duplicate country");
            }
        }
        assert_eq!(seen, active);

        // Region labels sorted alphabetically.
        let labels: Vec<&str> = groups.iter().map(|g| g.region.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn detail_view_distinguishes_empty_from_no_selection() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());

        assert_eq!(detail_view(&store, &filtered, None), DetailView::NoSelection);

        // US qualifies only through record 1; filter it out via type=2.
        let state = FilterState {
            type_codes: BTreeSet::from([2]),
            ..FilterState::default()
        };
        let narrowed = filter::apply(&store, &state);
        let us = CountryCode::new("us");
        assert_eq!(
            detail_view(&store, &narrowed, Some(&us)),
            DetailView::Empty {
                code: us.clone(),
                name: "United States".into(),
            }
        );
    }

    #[test]
    fn detail_view_exposes_record_fields_and_year() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());
        let fr = CountryCode::new("fr");

        let DetailView::Schemes { name, entries, .. } = detail_view(&store, &filtered, Some(&fr))
        else {
            panic!("expected schemes for fr");
        };
        assert_eq!(name, "France");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "AlphaID");
        assert_eq!(entries[0].first_issued, Some(2010));
        assert_eq!(entries[0].flow_types, vec!["redirect"]);
        assert_eq!(entries[1].first_issued, Some(2015));
    }

    #[test]
    fn selected_takes_precedence_over_active() {
        let store = sample_store();
        let filtered = filter::apply(&store, &FilterState::default());
        let active = active_countries(&store, &filtered, &BTreeSet::new());
        let fr = CountryCode::new("fr");
        let de = CountryCode::new("de");

        assert_eq!(country_style(&active, Some(&fr), &fr), CountryStyle::Selected);
        assert_eq!(country_style(&active, Some(&de), &fr), CountryStyle::Active);
        assert_eq!(country_style(&active, None, &de), CountryStyle::Inactive);
        // Selected wins even for a country that is not active.
        assert_eq!(country_style(&active, Some(&de), &de), CountryStyle::Selected);
    }

    #[test]
    fn join_or_falls_back_to_the_placeholder() {
        assert_eq!(join_or(&[1u8, 2, 3], "-"), "1, 2, 3");
        assert_eq!(join_or::<u8>(&[], "-"), "-");
        assert_eq!(join_or(&["remote", "on-site"], "\u{2500}"), "remote, on-site");
    }

    #[test]
    fn degraded_directory_collapses_into_unknown_region() {
        let store = sample_store_no_metadata();
        let filtered = filter::apply(&store, &FilterState::default());
        let groups = aggregate_by_region(&store, &filtered, &BTreeSet::new());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].region, UNKNOWN_REGION);
        // Display names degrade to the uppercased raw codes.
        let names: Vec<&str> = groups[0].countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["FR", "US"]);
    }
}
