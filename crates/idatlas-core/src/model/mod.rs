//! Canonical domain types shared by the engine and its consumers.

pub mod country;
pub mod record;
pub mod year;

pub use country::{CountryCode, CountryDirectory, CountryInfo, ResolvedCountry, UNKNOWN_REGION};
pub use record::{IdentityRecord, RecordId};
pub use year::YearIndex;
