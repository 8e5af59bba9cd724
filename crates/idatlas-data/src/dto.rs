// ── Wire-format DTOs ──
//
// Shapes mirror the JSON files on disk. Conversion into canonical domain
// types happens in idatlas-core's `convert` module; this crate stays a
// thin parsing layer.

use serde::Deserialize;

/// Record identifier as found in the source JSON; numeric or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(u64),
    Text(String),
}

impl IdValue {
    /// Normalized string form; numeric ids keep their decimal rendering.
    pub fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// One entry of the identity dataset (`schemes.json`).
///
/// Every field except `id` and `name` is optional: a gap-ridden record is
/// parsed, not rejected, and simply contributes nothing to the dimensions
/// it lacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDto {
    pub id: IdValue,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(rename = "type", default)]
    pub scheme_type: Option<u32>,
    #[serde(default)]
    pub loa: Vec<u8>,
    #[serde(default)]
    pub flow_types: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub need_action: Option<bool>,
}

/// One country descriptor (`countries.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct CountryDto {
    pub code: String,
    pub name: String,
    pub region: String,
}

/// The year-index file (`years.json`): either an id→year map or a list
/// of `{id, year}` pairs; both normalize to the same thing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearsFileDto {
    Map(std::collections::HashMap<String, u16>),
    Pairs(Vec<YearEntryDto>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearEntryDto {
    pub id: IdValue,
    pub year: u16,
}

impl YearsFileDto {
    pub fn into_entries(self) -> Vec<(String, u16)> {
        match self {
            Self::Map(map) => map.into_iter().collect(),
            Self::Pairs(pairs) => pairs
                .into_iter()
                .map(|entry| (entry.id.into_string(), entry.year))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scheme_parses_with_gaps() {
        let json = r#"{"id": 7, "name": "Bare"}"#;
        let dto: SchemeDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.id.into_string(), "7");
        assert!(dto.scheme_type.is_none());
        assert!(dto.loa.is_empty());
        assert!(dto.countries.is_empty());
    }

    #[test]
    fn scheme_accepts_string_ids() {
        let json = r#"{"id": "itsme", "name": "itsme", "type": 2, "loa": [2, 3]}"#;
        let dto: SchemeDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.id.into_string(), "itsme");
        assert_eq!(dto.scheme_type, Some(2));
        assert_eq!(dto.loa, vec![2, 3]);
    }

    #[test]
    fn years_parse_as_map_or_pairs() {
        let map: YearsFileDto = serde_json::from_str(r#"{"1": 2010, "2": 2015}"#).unwrap();
        let mut entries = map.into_entries();
        entries.sort();
        assert_eq!(entries, vec![("1".into(), 2010), ("2".into(), 2015)]);

        let pairs: YearsFileDto =
            serde_json::from_str(r#"[{"id": 1, "year": 2010}, {"id": "x", "year": 2015}]"#)
                .unwrap();
        let entries = pairs.into_entries();
        assert_eq!(entries, vec![("1".into(), 2010), ("x".into(), 2015)]);
    }
}
