// ── First-issuance year index ──

use std::collections::HashMap;

use super::record::RecordId;

/// Maps record identifiers to their first-issuance year.
///
/// Records absent from the index have an unknown year. A *failed* index
/// load is a different situation entirely; the store then carries no
/// `YearIndex` at all and the year dimension is disabled (see
/// [`DatasetStore`](crate::store::DatasetStore)).
#[derive(Debug, Clone, Default)]
pub struct YearIndex {
    by_record: HashMap<RecordId, u16>,
}

impl YearIndex {
    pub fn new(entries: impl IntoIterator<Item = (RecordId, u16)>) -> Self {
        Self {
            by_record: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_record.is_empty()
    }

    /// First-issuance year of a record, `None` when unknown.
    pub fn year_of(&self, id: &RecordId) -> Option<u16> {
        self.by_record.get(id).copied()
    }

    /// Distinct known years, ascending. This is the playback sequence.
    pub fn known_years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self.by_record.values().copied().collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_years_sorted_and_distinct() {
        let index = YearIndex::new([
            (RecordId::from(1u64), 2015),
            (RecordId::from(2u64), 2010),
            (RecordId::from(3u64), 2015),
        ]);
        assert_eq!(index.known_years(), vec![2010, 2015]);
    }

    #[test]
    fn year_of_missing_record_is_none() {
        let index = YearIndex::new([(RecordId::from(1u64), 2010)]);
        assert_eq!(index.year_of(&RecordId::from(1u64)), Some(2010));
        assert_eq!(index.year_of(&RecordId::from(9u64)), None);
    }
}
