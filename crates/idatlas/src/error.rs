//! CLI error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] idatlas_config::ConfigError),

    #[error(transparent)]
    Data(#[from] idatlas_data::DataError),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}
