use crate::table::{RunColumns, RunTable};
use crate::watermark::unix_now_ms;
use crate::{IndexStats, IndexerError, Result, Watermark};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Persisted run table plus what it was built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexSnapshot {
    pub schema_version: u32,
    pub built_at_unix_ms: u64,
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
    #[serde(default)]
    pub stats: IndexStats,
    pub columns: RunColumns,
}

impl IndexSnapshot {
    pub fn new(root: &Path, watermark: Watermark, table: &RunTable, stats: IndexStats) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            built_at_unix_ms: unix_now_ms(),
            root: root.to_string_lossy().into_owned(),
            watermark: Some(watermark),
            stats,
            columns: table.to_columns(),
        }
    }

    pub fn into_table(self) -> Result<RunTable> {
        RunTable::from_columns(self.columns)
    }
}

/// Atomically replace the snapshot at `path`.
pub async fn write_snapshot(path: &Path, snapshot: &IndexSnapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    log::info!(
        "Wrote snapshot with {} runs to {}",
        snapshot.columns.len(),
        path.display()
    );
    Ok(())
}

/// Read the snapshot at `path`; `Ok(None)` when there is none.
pub async fn read_snapshot(path: &Path) -> Result<Option<IndexSnapshot>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(None);
    }
    let bytes = tokio::fs::read(path).await?;
    let snapshot: IndexSnapshot = serde_json::from_slice(&bytes)?;
    if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
        return Err(IndexerError::SnapshotSchema(format!(
            "version {} (expected {SNAPSHOT_SCHEMA_VERSION})",
            snapshot.schema_version
        )));
    }
    Ok(Some(snapshot))
}

/// Read the table stored at `path` without touching the scan root.
pub async fn load_table(path: &Path) -> Result<RunTable> {
    match read_snapshot(path).await? {
        Some(snapshot) => snapshot.into_table(),
        None => Err(IndexerError::Other(format!(
            "no snapshot at {}; build the index first",
            path.display()
        ))),
    }
}
