use crate::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_INDEX_CONCURRENCY: usize = 32;

const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 64 * 1024 * 1024;
const DEFAULT_SNAPSHOT_PATH: &str = "model_index.json";

const ENV_CONCURRENCY: &str = "MODEL_RUNS_INDEX_CONCURRENCY";
const ENV_MAX_FILE_SIZE: &str = "MODEL_RUNS_MAX_FILE_SIZE";
const ENV_SNAPSHOT: &str = "MODEL_RUNS_SNAPSHOT";

/// Settings for scanning and indexing a run tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Folders extracted in parallel
    pub concurrency: usize,

    /// Files larger than this are skipped
    pub max_file_size_bytes: u64,

    /// File extensions scanned (case-insensitive, without the dot)
    pub extensions: Vec<String>,

    /// Where the snapshot is written
    pub snapshot_path: PathBuf,

    /// Text written for absent values in CSV exports
    pub csv_empty_marker: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_index_concurrency(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            extensions: vec!["txt".to_string()],
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            csv_empty_marker: String::new(),
        }
    }
}

impl IndexerConfig {
    /// Defaults overridden by `MODEL_RUNS_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Read a TOML config file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            IndexerError::Other(format!("read config {}: {err}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw)?;
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let concurrency = std::env::var(ENV_CONCURRENCY).ok();
        self.concurrency = parse_index_concurrency(concurrency.as_deref(), self.concurrency);

        if let Some(bytes) = std::env::var(ENV_MAX_FILE_SIZE)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            self.max_file_size_bytes = bytes;
        }

        if let Some(path) = std::env::var(ENV_SNAPSHOT)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            self.snapshot_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > MAX_INDEX_CONCURRENCY {
            return Err(IndexerError::Other(format!(
                "concurrency must be within 1..={MAX_INDEX_CONCURRENCY}, got {}",
                self.concurrency
            )));
        }
        if self.max_file_size_bytes == 0 {
            return Err(IndexerError::Other(
                "max_file_size_bytes must be > 0".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(IndexerError::Other(
                "at least one extension must be scanned".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_index_concurrency() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.clamp(1, MAX_INDEX_CONCURRENCY)
}

fn parse_index_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_INDEX_CONCURRENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let config = IndexerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extensions, vec!["txt".to_string()]);
        assert_eq!(config.csv_empty_marker, "");
    }

    #[test]
    fn concurrency_parsing_clamps_and_falls_back() {
        assert_eq!(parse_index_concurrency(None, 3), 3);
        assert_eq!(parse_index_concurrency(Some("  "), 3), 3);
        assert_eq!(parse_index_concurrency(Some("abc"), 3), 3);
        assert_eq!(parse_index_concurrency(Some("0"), 3), 1);
        assert_eq!(parse_index_concurrency(Some("999"), 3), MAX_INDEX_CONCURRENCY);
        assert_eq!(parse_index_concurrency(Some(" 4 "), 3), 4);
    }

    #[test]
    fn validation_rejects_zero_values() {
        let mut config = IndexerConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = IndexerConfig::default();
        config.max_file_size_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = IndexerConfig::default();
        config.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_file_fills_missing_keys_with_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("model-runs.toml");
        std::fs::write(
            &path,
            "concurrency = 2\nextensions = [\"txt\", \"out\"]\ncsv_empty_marker = \"NA\"\n",
        )
        .unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.extensions, vec!["txt".to_string(), "out".to_string()]);
        assert_eq!(config.csv_empty_marker, "NA");
        assert_eq!(config.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "concurrency = \"many\"\n").unwrap();
        assert!(matches!(
            IndexerConfig::load(&path),
            Err(IndexerError::ConfigError(_))
        ));
    }
}
