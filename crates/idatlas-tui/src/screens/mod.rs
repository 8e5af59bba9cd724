//! Screen implementations. Each screen is a top-level Component.

pub mod filters;
pub mod map;
pub mod schemes;

use idatlas_core::DatasetStore;

use crate::component::Component;
use crate::screen::ScreenId;

/// Comma-join values for a cell, with the box-drawing dash as the empty
/// placeholder every screen uses.
pub(crate) fn join_or_dash<T: std::fmt::Display>(values: &[T]) -> String {
    idatlas_core::join_or(values, "\u{2500}")
}

/// Create screen components for the tab bar.
pub fn create_screens(store: &DatasetStore) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Map, Box::new(map::MapScreen::new(store))),
        (
            ScreenId::Schemes,
            Box::new(schemes::SchemesScreen::new(store)),
        ),
        (
            ScreenId::Filters,
            Box::new(filters::FiltersScreen::new(store)),
        ),
    ]
}
