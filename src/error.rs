use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipetreeError {
    #[error("Failed to open input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column {column} on line {line}")]
    MissingField { column: &'static str, line: u64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipetreeError>;
