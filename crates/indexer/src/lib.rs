//! # Model Runs Indexer
//!
//! Builds, persists and queries the flat table of model runs found under a scan root.
//!
//! ## Pipeline
//!
//! ```text
//! Scan root
//!     │
//!     ├──> Folder Scanner (sorted folders, recursive *.txt)
//!     │      └─> Text files per folder
//!     │
//!     ├──> Run Extractor (per file, failures skip the file)
//!     │      └─> ModelRun rows
//!     │
//!     ├──> Snapshot (columnar JSON + filesystem watermark)
//!     │
//!     └──> Query / CSV export
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use model_runs_indexer::{IndexCache, IndexerConfig, RunFilter};
//!
//! #[tokio::main]
//! async fn main() -> model_runs_indexer::Result<()> {
//!     let cache = IndexCache::new("model_runs", "model_index.json", IndexerConfig::default())?;
//!     let loaded = cache.get().await?;
//!
//!     let rows = RunFilter::default().apply(&loaded.table);
//!     println!("{} runs", rows.len());
//!     Ok(())
//! }
//! ```

mod builder;
mod cache;
mod config;
mod error;
mod export;
mod query;
mod scanner;
mod snapshot;
mod stats;
mod table;
mod watermark;

pub use builder::{BuiltIndex, RunIndexer};
pub use cache::{IndexCache, IndexSource, LoadedIndex};
pub use config::{IndexerConfig, MAX_INDEX_CONCURRENCY};
pub use error::{IndexerError, Result};
pub use export::{export_csv, write_csv};
pub use query::{Facets, RunFilter, YearRange, DEFAULT_YEAR_SPAN};
pub use scanner::{FolderScanner, RunFolder};
pub use snapshot::{
    load_table, read_snapshot, write_snapshot, IndexSnapshot, SNAPSHOT_SCHEMA_VERSION,
};
pub use stats::IndexStats;
pub use table::{RunColumns, RunTable};
pub use watermark::{
    assess_staleness, compute_watermark, StaleAssessment, StaleReason, Watermark,
};
