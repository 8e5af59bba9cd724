// ── Identity scheme record ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::country::CountryCode;

/// Unique identifier of a scheme record.
///
/// Source data mixes numeric and string identifiers; both are carried in
/// string form so they key the year index uniformly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// One digital-identity scheme entry.
///
/// Gaps in the source data are not errors: absent collections are empty,
/// an absent type code is `None`. A record quietly contributes nothing to
/// the dimensions it lacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: RecordId,
    pub name: String,
    /// Logo reference (URL or asset path) for the detail panel.
    pub logo: Option<String>,
    /// Numeric scheme type code. `None` never matches a restricted
    /// type dimension.
    pub type_code: Option<u32>,
    /// Assurance levels (LoA) this scheme supports.
    #[serde(default)]
    pub levels: Vec<u8>,
    /// Flow-type labels (e.g. redirect, app-to-app).
    #[serde(default)]
    pub flow_types: Vec<String>,
    /// Scope labels the scheme can assert.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Supported countries; may be empty.
    #[serde(default)]
    pub countries: Vec<CountryCode>,
    /// Whether end-user action is required before the scheme is usable.
    pub need_action: Option<bool>,
}

impl IdentityRecord {
    /// Whether this record lists the given country (codes are lowercase
    /// by construction, so this is a case-insensitive test).
    pub fn supports_country(&self, code: &CountryCode) -> bool {
        self.countries.contains(code)
    }
}
