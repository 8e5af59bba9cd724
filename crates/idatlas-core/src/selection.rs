// ── Country selection state machine ──

use crate::model::CountryCode;

/// Two-state selection: `Unselected` or `Selected(code)`.
///
/// Any filter-dimension change invalidates the selection; the previously
/// selected country might no longer be relevant under the new criteria.
/// There is no explicit deselect beyond that; re-selecting the already
/// selected country is an idempotent re-entry.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<CountryCode>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&CountryCode> {
        self.selected.as_ref()
    }

    /// Enter `Selected(code)`. Returns `false` when the code was already
    /// selected (re-render, no state change).
    pub fn select(&mut self, code: CountryCode) -> bool {
        if self.selected.as_ref() == Some(&code) {
            return false;
        }
        self.selected = Some(code);
        true
    }

    /// Forced transition back to `Unselected` after a filter change.
    /// Returns `true` when a selection was actually dropped.
    pub fn invalidate(&mut self) -> bool {
        self.selected.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_then_invalidate() {
        let mut selection = SelectionController::new();
        assert!(selection.selected().is_none());

        assert!(selection.select(CountryCode::new("fr")));
        assert_eq!(selection.selected(), Some(&CountryCode::new("fr")));

        assert!(selection.invalidate());
        assert!(selection.selected().is_none());
        // Idempotent: nothing left to drop.
        assert!(!selection.invalidate());
    }

    #[test]
    fn reselecting_same_country_is_idempotent() {
        let mut selection = SelectionController::new();
        assert!(selection.select(CountryCode::new("fr")));
        assert!(!selection.select(CountryCode::new("FR")));
        assert_eq!(selection.selected(), Some(&CountryCode::new("fr")));
    }

    #[test]
    fn selecting_another_country_replaces() {
        let mut selection = SelectionController::new();
        selection.select(CountryCode::new("fr"));
        assert!(selection.select(CountryCode::new("de")));
        assert_eq!(selection.selected(), Some(&CountryCode::new("de")));
    }
}
