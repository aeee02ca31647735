use std::path::PathBuf;
use thiserror::Error;

/// Start-up failures. Any of these halts initialization before an engine
/// is constructed.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Required input unavailable: {0}")]
    Environment(String),
}
