//! Input loading for the idatlas workspace.
//!
//! Reads the three JSON inputs; the identity dataset, country metadata,
//! and the first-issuance year index; into wire-format DTOs and applies
//! the degradation rules: the dataset is mandatory, the two supplements
//! fail soft and are recorded in a [`LoadReport`].
//!
//! Conversion into canonical domain types lives in `idatlas-core`.

pub mod dto;
pub mod error;
pub mod loader;

pub use dto::{CountryDto, IdValue, SchemeDto, YearEntryDto, YearsFileDto};
pub use error::DataError;
pub use loader::{DataBundle, DataPaths, LoadReport, load_bundle};
