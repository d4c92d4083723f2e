use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid proof config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid dimension: {value} (expected a finite, non-negative number of inches)")]
    InvalidDimension { value: f64 },

    #[error("Dimension table has no entry for {entry}")]
    MissingTableEntry { entry: String },

    #[error("Legend file not found: {file_name}")]
    LegendNotFound { file_name: String, path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
