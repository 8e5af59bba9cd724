// ── File loading with graceful degradation ──
//
// Only the identity dataset is load-bearing. Country metadata and the
// year index are supplements: when one of them fails, the bundle still
// loads and the report records the degradation so UIs can adapt
// (single "Unknown" region bucket, hidden year control).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dto::{CountryDto, SchemeDto, YearsFileDto};
use crate::error::DataError;

/// Locations of the three input files.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub schemes: PathBuf,
    pub countries: PathBuf,
    pub years: PathBuf,
}

impl DataPaths {
    /// Conventional file names under a single data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            schemes: dir.join("schemes.json"),
            countries: dir.join("countries.json"),
            years: dir.join("years.json"),
        }
    }
}

/// Parsed (but not yet converted) input data.
#[derive(Debug, Clone)]
pub struct DataBundle {
    pub schemes: Vec<SchemeDto>,
    /// `None` when the metadata file failed to load.
    pub countries: Option<Vec<CountryDto>>,
    /// `None` when the year-index file failed to load; the year
    /// dimension must then be disabled, not merely left empty.
    pub years: Option<Vec<(String, u16)>>,
}

/// What happened during loading, for operator logs and UI adaptation.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub scheme_count: usize,
    pub countries_degraded: bool,
    pub years_disabled: bool,
    pub warnings: Vec<String>,
}

/// Load all three inputs.
///
/// Dataset failure is fatal; the two supplements fail soft, each
/// degradation recorded in the [`LoadReport`].
pub async fn load_bundle(paths: &DataPaths) -> Result<(DataBundle, LoadReport), DataError> {
    let schemes: Vec<SchemeDto> = read_json(&paths.schemes).await?;
    info!(count = schemes.len(), path = %paths.schemes.display(), "loaded identity dataset");

    let mut report = LoadReport {
        scheme_count: schemes.len(),
        ..LoadReport::default()
    };

    let countries = match read_json::<Vec<CountryDto>>(&paths.countries).await {
        Ok(countries) => {
            info!(count = countries.len(), "loaded country metadata");
            Some(countries)
        }
        Err(e) => {
            let msg = format!(
                "country metadata unavailable ({e}); all countries fall into the Unknown region"
            );
            warn!("{msg}");
            report.countries_degraded = true;
            report.warnings.push(msg);
            None
        }
    };

    let years = match read_json::<YearsFileDto>(&paths.years).await {
        Ok(years) => {
            let entries = years.into_entries();
            info!(count = entries.len(), "loaded year index");
            Some(entries)
        }
        Err(e) => {
            let msg = format!("year index unavailable ({e}); year filtering disabled");
            warn!("{msg}");
            report.years_disabled = true;
            report.warnings.push(msg);
            None
        }
    };

    Ok((
        DataBundle {
            schemes,
            countries,
            years,
        },
        report,
    ))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let raw = tokio::fs::read(path).await.map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
