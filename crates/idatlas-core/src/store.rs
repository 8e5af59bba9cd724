// ── Immutable dataset store ──
//
// Holds the raw record list, the country directory, and the optional
// year index once loading has completed. Everything downstream is a
// pure function over this store plus the current FilterState.

use std::sync::Arc;

use crate::model::{CountryDirectory, IdentityRecord, RecordId, YearIndex};

/// The loaded, immutable dataset.
///
/// `years` is `None` when the year-index file failed to load. That is
/// deliberately distinct from a loaded-but-sparse index: with no index at
/// all, the year dimension is disabled entirely (a cutoff over an empty
/// index would exclude every record).
#[derive(Debug, Clone)]
pub struct DatasetStore {
    records: Arc<Vec<Arc<IdentityRecord>>>,
    directory: CountryDirectory,
    years: Option<YearIndex>,
}

impl DatasetStore {
    pub fn new(
        records: Vec<IdentityRecord>,
        directory: CountryDirectory,
        years: Option<YearIndex>,
    ) -> Self {
        Self {
            records: Arc::new(records.into_iter().map(Arc::new).collect()),
            directory,
            years,
        }
    }

    /// The full record list in dataset order (cheap `Arc` clone).
    pub fn records(&self) -> Arc<Vec<Arc<IdentityRecord>>> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    pub fn year_index(&self) -> Option<&YearIndex> {
        self.years.as_ref()
    }

    /// Whether the year dimension can be filtered at all.
    pub fn years_enabled(&self) -> bool {
        self.years.is_some()
    }

    /// First-issuance year of a record; `None` when unknown or when the
    /// year dimension is disabled.
    pub fn year_of(&self, id: &RecordId) -> Option<u16> {
        self.years.as_ref().and_then(|index| index.year_of(id))
    }

    /// Distinct known years, ascending; empty when the dimension is
    /// disabled. This is the playback sequence.
    pub fn known_years(&self) -> Vec<u16> {
        self.years
            .as_ref()
            .map(YearIndex::known_years)
            .unwrap_or_default()
    }
}
