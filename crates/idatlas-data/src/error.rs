// ── Data loading errors ──

use std::path::PathBuf;

use thiserror::Error;

/// Fatal loading errors. Only the identity dataset itself is fatal;
/// country metadata and the year index degrade instead (see `loader`).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
