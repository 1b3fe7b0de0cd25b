//! Memoized access to the run table of one scan root.
//!
//! The cached table stays valid until [`IndexCache::invalidate`] is called or the root's
//! watermark moves. There is no time-based expiry. A rebuild swaps in a complete table, so
//! readers never see a partial one.

use crate::builder::RunIndexer;
use crate::scanner::FolderScanner;
use crate::snapshot::{read_snapshot, write_snapshot, IndexSnapshot};
use crate::table::RunTable;
use crate::watermark::{assess_staleness, compute_watermark};
use crate::{
    IndexStats, IndexerConfig, IndexerError, Result, StaleAssessment, StaleReason, Watermark,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a loaded table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSource {
    Memory,
    Snapshot,
    Rebuilt,
}

#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub table: Arc<RunTable>,
    pub source: IndexSource,
    pub stats: IndexStats,
    /// Why the previous table was not reused (empty unless rebuilt)
    pub stale_reasons: Vec<StaleReason>,
}

#[derive(Debug, Clone)]
struct CachedIndex {
    table: Arc<RunTable>,
    stats: IndexStats,
    watermark: Watermark,
}

pub struct IndexCache {
    root: PathBuf,
    snapshot_path: PathBuf,
    config: IndexerConfig,
    current: RwLock<Option<CachedIndex>>,
}

impl IndexCache {
    pub fn new(
        root: impl AsRef<Path>,
        snapshot_path: impl AsRef<Path>,
        config: IndexerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
            config,
            current: RwLock::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Return the table, reusing memory or the snapshot while the root is unchanged.
    pub async fn get(&self) -> Result<LoadedIndex> {
        let watermark = self.current_watermark().await?;

        if let Some(cached) = self.current.read().await.as_ref() {
            if cached.watermark.same_content(&watermark) {
                return Ok(LoadedIndex {
                    table: Arc::clone(&cached.table),
                    source: IndexSource::Memory,
                    stats: cached.stats.clone(),
                    stale_reasons: Vec::new(),
                });
            }
        }

        let (assessment, snapshot) = self.probe_snapshot(&watermark).await;
        if let (false, Some(snapshot)) = (assessment.stale, snapshot) {
            let stats = snapshot.stats.clone();
            match snapshot.into_table() {
                Ok(table) => {
                    log::info!("Reusing snapshot {}", self.snapshot_path.display());
                    let table = Arc::new(table);
                    self.store(Arc::clone(&table), stats.clone(), watermark).await;
                    return Ok(LoadedIndex {
                        table,
                        source: IndexSource::Snapshot,
                        stats,
                        stale_reasons: Vec::new(),
                    });
                }
                Err(err) => {
                    log::warn!("Snapshot {} unusable: {err}", self.snapshot_path.display());
                    return self.rebuild_with_reasons(vec![StaleReason::SnapshotCorrupt]).await;
                }
            }
        }

        self.rebuild_with_reasons(assessment.reasons).await
    }

    /// Rebuild from the root unconditionally and replace the snapshot.
    pub async fn rebuild(&self) -> Result<LoadedIndex> {
        self.rebuild_with_reasons(Vec::new()).await
    }

    /// Drop the in-memory table; the next `get` re-checks the snapshot.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    /// Whether the snapshot still matches the root
    pub async fn status(&self) -> Result<StaleAssessment> {
        let watermark = self.current_watermark().await?;
        Ok(self.probe_snapshot(&watermark).await.0)
    }

    async fn rebuild_with_reasons(&self, reasons: Vec<StaleReason>) -> Result<LoadedIndex> {
        if !reasons.is_empty() {
            log::info!("Rebuilding index: {reasons:?}");
        }
        let indexer = RunIndexer::new(&self.root, self.config.clone())?;
        let built = indexer.build().await?;

        let snapshot = IndexSnapshot::new(
            &self.root,
            built.watermark.clone(),
            &built.table,
            built.stats.clone(),
        );
        write_snapshot(&self.snapshot_path, &snapshot).await?;

        let table = Arc::new(built.table);
        self.store(Arc::clone(&table), built.stats.clone(), built.watermark)
            .await;
        Ok(LoadedIndex {
            table,
            source: IndexSource::Rebuilt,
            stats: built.stats,
            stale_reasons: reasons,
        })
    }

    async fn store(&self, table: Arc<RunTable>, stats: IndexStats, watermark: Watermark) {
        *self.current.write().await = Some(CachedIndex {
            table,
            stats,
            watermark,
        });
    }

    async fn current_watermark(&self) -> Result<Watermark> {
        let scanner = FolderScanner::new(&self.root, &self.config);
        tokio::task::spawn_blocking(move || compute_watermark(&scanner))
            .await
            .map_err(|e| IndexerError::Other(format!("watermark task failed: {e}")))?
    }

    async fn probe_snapshot(
        &self,
        watermark: &Watermark,
    ) -> (StaleAssessment, Option<IndexSnapshot>) {
        match read_snapshot(&self.snapshot_path).await {
            Ok(None) => (assess_staleness(watermark, false, false, None), None),
            Ok(Some(snapshot)) => {
                let mut assessment =
                    assess_staleness(watermark, true, false, snapshot.watermark.as_ref());
                if Path::new(&snapshot.root) != self.root.as_path() {
                    assessment.reasons.push(StaleReason::RootMismatch);
                    assessment.stale = true;
                }
                (assessment, Some(snapshot))
            }
            Err(err) => {
                log::warn!(
                    "Failed to read snapshot {}: {err}",
                    self.snapshot_path.display()
                );
                (assess_staleness(watermark, true, true, None), None)
            }
        }
    }
}
