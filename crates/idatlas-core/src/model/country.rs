// ── Country code and metadata directory ──

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Region label used for every country the directory does not know.
pub const UNKNOWN_REGION: &str = "Unknown";

/// ISO 3166-1 alpha-2 country code, stored lowercased.
///
/// Codes are compared case-insensitively everywhere, so normalization
/// happens once at construction and never again.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercased form, used as a display fallback when the directory
    /// has no entry for this code.
    pub fn display_fallback(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Display name and region for a single country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    pub region: String,
}

/// Resolved country view; always answers, falling back to the raw code
/// and the `"Unknown"` region for directory misses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCountry {
    pub name: String,
    pub region: String,
}

/// Lookup from lowercase country code to display name and region.
///
/// An empty directory is valid: it is the degraded mode entered when the
/// country-metadata file fails to load, and collapses every country into
/// the `"Unknown"` region.
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    entries: HashMap<CountryCode, CountryInfo>,
}

impl CountryDirectory {
    pub fn new(entries: impl IntoIterator<Item = (CountryCode, CountryInfo)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The degraded, metadata-less directory.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &CountryCode) -> Option<&CountryInfo> {
        self.entries.get(code)
    }

    /// Resolve a code to its display name and region, degrading to the
    /// uppercased code and `"Unknown"` on misses.
    pub fn resolve(&self, code: &CountryCode) -> ResolvedCountry {
        self.entries.get(code).map_or_else(
            || ResolvedCountry {
                name: code.display_fallback(),
                region: UNKNOWN_REGION.to_string(),
            },
            |info| ResolvedCountry {
                name: info.name.clone(),
                region: info.region.clone(),
            },
        )
    }

    /// Region label for a code, `"Unknown"` on misses.
    pub fn region_of(&self, code: &CountryCode) -> &str {
        self.entries
            .get(code)
            .map_or(UNKNOWN_REGION, |info| info.region.as_str())
    }

    /// All distinct region labels present in the directory, sorted.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .entries
            .values()
            .map(|info| info.region.clone())
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn code_normalizes_to_lowercase() {
        assert_eq!(CountryCode::new("FR"), CountryCode::new("fr"));
        assert_eq!(CountryCode::new(" Us ").as_str(), "us");
    }

    #[test]
    fn resolve_known_code() {
        let dir = CountryDirectory::new([(
            CountryCode::new("fr"),
            CountryInfo {
                name: "France".into(),
                region: "Europe".into(),
            },
        )]);
        let resolved = dir.resolve(&CountryCode::new("FR"));
        assert_eq!(resolved.name, "France");
        assert_eq!(resolved.region, "Europe");
    }

    #[test]
    fn resolve_miss_degrades_to_code_and_unknown() {
        let dir = CountryDirectory::empty();
        let resolved = dir.resolve(&CountryCode::new("xk"));
        assert_eq!(resolved.name, "XK");
        assert_eq!(resolved.region, UNKNOWN_REGION);
    }

    #[test]
    fn regions_are_sorted_and_distinct() {
        let dir = CountryDirectory::new([
            (
                CountryCode::new("fr"),
                CountryInfo {
                    name: "France".into(),
                    region: "Europe".into(),
                },
            ),
            (
                CountryCode::new("de"),
                CountryInfo {
                    name: "Germany".into(),
                    region: "Europe".into(),
                },
            ),
            (
                CountryCode::new("us"),
                CountryInfo {
                    name: "United States".into(),
                    region: "Americas".into(),
                },
            ),
        ]);
        assert_eq!(dir.regions(), vec!["Americas", "Europe"]);
    }
}
