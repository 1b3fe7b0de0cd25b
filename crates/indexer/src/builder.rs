use crate::error::{IndexerError, Result};
use crate::scanner::{FolderScanner, RunFolder};
use crate::stats::IndexStats;
use crate::table::RunTable;
use crate::watermark::compute_watermark;
use crate::{IndexerConfig, Watermark};
use model_runs_extractor::{extract_file, ModelRun};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Result of one complete build
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub table: RunTable,
    pub stats: IndexStats,
    pub watermark: Watermark,
}

/// Builds the run table for every folder under a scan root
pub struct RunIndexer {
    root: PathBuf,
    config: IndexerConfig,
}

struct FolderIndex {
    runs: Vec<ModelRun>,
    stats: IndexStats,
}

impl RunIndexer {
    /// Create an indexer for `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>, config: IndexerConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }
        config.validate()?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Scan every folder and extract every file.
    ///
    /// Folders are extracted concurrently up to the configured limit and reassembled in sorted
    /// folder order, so the table is identical to a sequential build. Files that cannot be read
    /// are skipped and counted in the stats.
    pub async fn build(&self) -> Result<BuiltIndex> {
        let start = Instant::now();
        log::info!("Indexing model runs under {}", self.root.display());

        let scanner = FolderScanner::new(&self.root, &self.config);
        let (watermark, folders) = {
            let scanner = scanner.clone();
            tokio::task::spawn_blocking(move || -> Result<(Watermark, Vec<RunFolder>)> {
                let watermark = compute_watermark(&scanner)?;
                let folders = scanner.folders()?;
                Ok((watermark, folders))
            })
            .await
            .map_err(|e| IndexerError::Other(format!("scan task failed: {e}")))??
        };

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let handles: Vec<_> = folders
            .into_iter()
            .map(|folder| {
                let semaphore = Arc::clone(&semaphore);
                let scanner = scanner.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| IndexerError::Other(format!("indexing permit: {e}")))?;
                    tokio::task::spawn_blocking(move || index_folder(&scanner, &folder))
                        .await
                        .map_err(|e| IndexerError::Other(format!("folder task failed: {e}")))
                })
            })
            .collect();

        let mut rows = Vec::new();
        let mut stats = IndexStats::new();
        for handle in handles {
            let folder = handle
                .await
                .map_err(|e| IndexerError::Other(format!("folder task failed: {e}")))??;
            rows.extend(folder.runs);
            stats.merge(folder.stats);
        }

        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Indexed {} runs from {} files in {} folders ({} skipped) in {} ms",
            stats.runs,
            stats.files,
            stats.folders,
            stats.files_skipped,
            stats.time_ms
        );

        Ok(BuiltIndex {
            table: RunTable::new(rows),
            stats,
            watermark,
        })
    }
}

fn index_folder(scanner: &FolderScanner, folder: &RunFolder) -> FolderIndex {
    let mut runs = Vec::new();
    let mut stats = IndexStats::new();
    stats.folders = 1;

    for path in scanner.text_files(&folder.path) {
        match extract_file(&folder.path, &path) {
            Ok(file_runs) => {
                stats.add_file(&file_runs);
                runs.extend(file_runs);
            }
            Err(err) => {
                log::warn!("Skipping {}: {err}", path.display());
                stats.add_skipped(format!("{}: {err}", path.display()));
            }
        }
    }

    log::debug!(
        "Folder {}: {} runs from {} files",
        folder.name,
        stats.runs,
        stats.files
    );
    FolderIndex { runs, stats }
}
