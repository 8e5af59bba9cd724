// ── FilterState and FilterEngine ──
//
// The multi-dimensional filter: OR within a dimension, AND across
// dimensions, empty selection = no restriction on that dimension.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{CountryCode, IdentityRecord};
use crate::store::DatasetStore;

/// Current filter criteria plus the selected country.
///
/// Every dimension is an explicit set; the empty set means "unrestricted".
/// This keeps a selected value of `0` distinguishable from "nothing
/// selected", which a sentinel-based encoding cannot do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected assurance levels (OR semantics).
    pub levels: BTreeSet<u8>,
    /// Selected scheme type codes (OR semantics).
    pub type_codes: BTreeSet<u32>,
    /// Selected region labels (OR semantics, record passes via any country).
    pub regions: BTreeSet<String>,
    /// Inclusive first-issuance year cutoff; `None` = unrestricted.
    pub year_cutoff: Option<u16>,
    /// Currently selected country, if any.
    pub selected: Option<CountryCode>,
}

impl FilterState {
    /// Whether any dimension restricts the result set.
    pub fn is_restricted(&self) -> bool {
        !self.levels.is_empty()
            || !self.type_codes.is_empty()
            || !self.regions.is_empty()
            || self.year_cutoff.is_some()
    }
}

/// Apply the filter to the full dataset, preserving dataset order.
///
/// Pure and deterministic: same inputs, same ordered output. The returned
/// vector is always a fresh subset; nothing is mutated in place.
pub fn apply(store: &DatasetStore, state: &FilterState) -> Vec<Arc<IdentityRecord>> {
    store
        .records()
        .iter()
        .filter(|record| matches(store, state, record))
        .map(Arc::clone)
        .collect()
}

fn matches(store: &DatasetStore, state: &FilterState, record: &IdentityRecord) -> bool {
    matches_levels(&state.levels, record)
        && matches_type(&state.type_codes, record)
        && matches_region(store, &state.regions, record)
        && matches_year(store, state.year_cutoff, record)
}

/// Empty selection passes; otherwise the record's own level set must
/// intersect the selection.
fn matches_levels(selected: &BTreeSet<u8>, record: &IdentityRecord) -> bool {
    selected.is_empty() || record.levels.iter().any(|level| selected.contains(level))
}

/// Empty selection passes; a record without a type code never matches a
/// restricted type dimension.
fn matches_type(selected: &BTreeSet<u32>, record: &IdentityRecord) -> bool {
    selected.is_empty()
        || record
            .type_code
            .is_some_and(|code| selected.contains(&code))
}

/// Record-level region test: at least one of the record's countries must
/// resolve into the selected set. A record with zero countries fails
/// whenever the dimension is restricted.
fn matches_region(store: &DatasetStore, selected: &BTreeSet<String>, record: &IdentityRecord) -> bool {
    selected.is_empty()
        || record
            .countries
            .iter()
            .any(|code| selected.contains(store.directory().region_of(code)))
}

/// Year test: the record's year must be known and at or before the cutoff.
/// A cutoff set while the year dimension is disabled is ignored (the
/// Explorer refuses to set one, but the engine stays total).
fn matches_year(store: &DatasetStore, cutoff: Option<u16>, record: &IdentityRecord) -> bool {
    let Some(cutoff) = cutoff else {
        return true;
    };
    if !store.years_enabled() {
        return true;
    }
    store
        .year_of(&record.id)
        .is_some_and(|year| year <= cutoff)
}

/// Is a single country admitted by the region dimension on its own merit?
///
/// This is the stricter per-country check used for map coloring and the
/// aggregation list: a multi-country record can pass [`apply`]'s
/// record-level OR test through one country while only its matching
/// countries show up as active.
pub fn country_in_regions(
    store: &DatasetStore,
    selected: &BTreeSet<String>,
    code: &CountryCode,
) -> bool {
    selected.is_empty() || selected.contains(store.directory().region_of(code))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testutil::{sample_store, sample_store_no_years};
    use crate::model::RecordId;

    fn ids(filtered: &[Arc<IdentityRecord>]) -> Vec<&str> {
        filtered.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn unrestricted_state_passes_all_records_in_order() {
        let store = sample_store();
        let filtered = apply(&store, &FilterState::default());
        assert_eq!(ids(&filtered), vec!["1", "2"]);
    }

    #[test]
    fn empty_dimension_equals_ignoring_it() {
        let store = sample_store();
        let mut state = FilterState::default();
        state.levels = BTreeSet::new();
        state.type_codes = BTreeSet::from([2]);

        let with_empty_levels = apply(&store, &state);

        // Same filter computed while the level dimension does not exist
        // at all; only the type test applied by hand.
        let records = store.records();
        let by_hand: Vec<&str> = records
            .iter()
            .filter(|r| r.type_code == Some(2))
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(ids(&with_empty_levels), by_hand);
    }

    #[test]
    fn level_filter_uses_or_semantics() {
        let store = sample_store();
        let state = FilterState {
            levels: BTreeSet::from([1, 3]),
            ..FilterState::default()
        };
        // Record 1 has levels [2,3] (matches via 3), record 2 has [1].
        assert_eq!(ids(&apply(&store, &state)), vec!["1", "2"]);

        let state = FilterState {
            levels: BTreeSet::from([3]),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply(&store, &state)), vec!["1"]);
    }

    #[test]
    fn type_filter_selects_single_record() {
        let store = sample_store();
        let state = FilterState {
            type_codes: BTreeSet::from([2]),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply(&store, &state)), vec!["2"]);
    }

    #[test]
    fn record_without_type_fails_restricted_type_dimension() {
        let store = sample_store();
        let state = FilterState {
            type_codes: BTreeSet::from([3]),
            ..FilterState::default()
        };
        // Record 3 has no type code; even a selection containing its
        // "would-be" value cannot match it.
        assert!(apply(&store, &state).is_empty());
    }

    #[test]
    fn region_filter_admits_record_via_any_country() {
        let store = sample_store();
        let state = FilterState {
            regions: BTreeSet::from(["Europe".to_string()]),
            ..FilterState::default()
        };
        // Record 1 (US+FR) passes via FR, record 2 (FR) passes directly.
        assert_eq!(ids(&apply(&store, &state)), vec!["1", "2"]);
    }

    #[test]
    fn record_with_no_countries_fails_restricted_region_dimension() {
        let store = sample_store();
        let state = FilterState {
            regions: BTreeSet::from(["Unknown".to_string()]),
            ..FilterState::default()
        };
        // Record 3 lists zero countries; it cannot pass any region filter.
        assert!(apply(&store, &state).is_empty());
    }

    #[test]
    fn year_cutoff_excludes_later_and_unknown_years() {
        let store = sample_store();
        let state = FilterState {
            year_cutoff: Some(2012),
            ..FilterState::default()
        };
        // Years: record 1 → 2010, record 2 → 2015, record 3 → unknown.
        assert_eq!(ids(&apply(&store, &state)), vec!["1"]);
    }

    #[test]
    fn year_cutoff_ignored_when_dimension_disabled() {
        let store = sample_store_no_years();
        let state = FilterState {
            year_cutoff: Some(2012),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply(&store, &state)), vec!["1", "2", "3"]);
    }

    #[test]
    fn reapplying_same_state_is_idempotent() {
        let store = sample_store();
        let state = FilterState {
            levels: BTreeSet::from([1]),
            regions: BTreeSet::from(["Europe".to_string()]),
            ..FilterState::default()
        };
        let first = apply(&store, &state);
        let second = apply(&store, &state);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn filtered_set_preserves_dataset_order() {
        let store = sample_store();
        let state = FilterState {
            levels: BTreeSet::from([1, 2]),
            ..FilterState::default()
        };
        let filtered = apply(&store, &state);
        let positions: Vec<usize> = filtered
            .iter()
            .map(|r| {
                store
                    .records()
                    .iter()
                    .position(|o| o.id == r.id)
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn zero_is_a_selectable_level() {
        let store = sample_store();
        let state = FilterState {
            levels: BTreeSet::from([0]),
            ..FilterState::default()
        };
        // No sample record carries level 0, so the selection restricts
        // to nothing; distinctly not "unrestricted".
        assert!(apply(&store, &state).is_empty());
        assert!(state.is_restricted());
    }

    #[test]
    fn per_country_region_check_is_stricter_than_record_test() {
        let store = sample_store();
        let selected = BTreeSet::from(["Europe".to_string()]);
        assert!(country_in_regions(&store, &selected, &CountryCode::new("fr")));
        assert!(!country_in_regions(&store, &selected, &CountryCode::new("us")));
        // Unrestricted region dimension admits everything.
        assert!(country_in_regions(&store, &BTreeSet::new(), &CountryCode::new("us")));
    }

    #[test]
    fn year_lookup_uses_record_id() {
        let store = sample_store();
        assert_eq!(store.year_of(&RecordId::from(1u64)), Some(2010));
        assert_eq!(store.year_of(&RecordId::from(3u64)), None);
    }
}
