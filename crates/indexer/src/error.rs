use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    ExtractError(#[from] model_runs_extractor::ExtractError),

    #[error("Snapshot encoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid scan root: {0}")]
    InvalidPath(String),

    #[error("Snapshot schema mismatch: {0}")]
    SnapshotSchema(String),

    #[error("{0}")]
    Other(String),
}
