//! Filter, derivation, and selection engine for exploring digital-identity
//! scheme support per country.
//!
//! This crate owns the domain model and the pure pipeline from
//! (dataset, country metadata, filter state, selection, playback) to the
//! derived view-models consumed by the CLI and TUI:
//!
//! - **[`DatasetStore`]**: the immutable raw record list, country
//!   directory, and optional year index, loaded once.
//! - **[`filter`]**: `FilterState` and the FilterEngine: ordered subset
//!   of records matching every restricted dimension (OR within, AND
//!   across, empty set = unrestricted).
//! - **[`view`]**: the four derived view-models: active-country set for
//!   map coloring, region-grouped country aggregation, the support-pair
//!   counter, and the selected-country detail view.
//! - **[`selection`]**: the Unselected/Selected(country) transition,
//!   invalidated by any filter change.
//! - **[`playback`]**: the year time-lapse sequencer stepping the cutoff
//!   through every known year.
//! - **[`Explorer`]**: facade owning the mutable state, recomputing all
//!   derived artifacts on every transition and publishing immutable
//!   [`ViewSnapshot`]s over a `watch` channel; also arms and cancels the
//!   single playback timer task.
//!
//! Everything below the Explorer is a pure function: same inputs, same
//! ordered outputs, no presentation surface required for testing.

pub mod convert;
pub mod explorer;
pub mod filter;
pub mod model;
pub mod playback;
pub mod selection;
pub mod store;
pub mod view;

#[cfg(test)]
mod testutil;

// ── Primary re-exports ──────────────────────────────────────────────
pub use convert::{build_store, load_explorer};
pub use explorer::{
    ChangeOrigin, DEFAULT_PLAYBACK_INTERVAL, Explorer, ExplorerOptions, ViewSnapshot,
};
pub use filter::FilterState;
pub use model::{
    CountryCode, CountryDirectory, CountryInfo, IdentityRecord, RecordId, ResolvedCountry,
    UNKNOWN_REGION, YearIndex,
};
pub use playback::PlaybackStatus;
pub use selection::SelectionController;
pub use store::DatasetStore;
pub use view::{CountryAggregate, CountryStyle, DetailEntry, DetailView, RegionGroup, join_or};
