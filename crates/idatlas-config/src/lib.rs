//! Shared configuration for the idatlas CLI and TUI.
//!
//! Configuration is layered figment-style: built-in defaults, then the
//! TOML file at the platform config path, then `IDATLAS_*` environment
//! variables (nested keys split on `__`, e.g. `IDATLAS_PLAYBACK__INTERVAL_MS`).

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use idatlas_data::DataPaths;

pub const ENV_PREFIX: &str = "IDATLAS_";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    NoConfigDir,

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where the three input files live.
///
/// Either a single `dir` holding the conventionally named files, or
/// per-file overrides (which win over the directory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSection {
    pub dir: Option<PathBuf>,
    pub schemes: Option<PathBuf>,
    pub countries: Option<PathBuf>,
    pub years: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSection {
    /// Year time-lapse step interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSection,
    pub playback: PlaybackSection,
}

impl Config {
    /// Resolve the effective input-file locations. Per-file settings win
    /// over the data directory; the directory defaults to `./data`.
    pub fn data_paths(&self) -> DataPaths {
        let dir = self
            .data
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"));
        let defaults = DataPaths::in_dir(&dir);
        DataPaths {
            schemes: self.data.schemes.clone().unwrap_or(defaults.schemes),
            countries: self.data.countries.clone().unwrap_or(defaults.countries),
            years: self.data.years.clone().unwrap_or(defaults.years),
        }
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback.interval_ms)
    }
}

/// Platform config file path (e.g. `~/.config/idatlas/config.toml`).
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("", "", "idatlas").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}

/// Load configuration from an explicit file path (or the platform path),
/// layered under `IDATLAS_*` environment overrides. A missing file is
/// not an error; defaults apply.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)?;
    Ok(config)
}

/// Write the configuration to an explicit file path (or the platform
/// path), creating parent directories as needed. Returns the path written.
pub fn save_config(config: &Config, path: Option<&PathBuf>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    let rendered = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
    }
    std::fs::write(&path, rendered).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
