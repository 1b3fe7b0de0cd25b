use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while reading a file for extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// File is not located under its folder root
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl ExtractError {
    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }
}
