//! # Model Runs Extractor
//!
//! Tolerant metadata extraction for engineering-analysis output files.
//!
//! ## Pipeline
//!
//! ```text
//! File text
//!     │
//!     ├──> Pass 1: line segmentation
//!     │      ├─> open a run on every TITLE= line
//!     │      ├─> split the title for building / station / year
//!     │      └─> attach the first SUBTITLE= / LABEL= before the next title
//!     │
//!     └──> Pass 2: whole-file enrichment
//!            └─> backfill code, building, station, year from the full text
//! ```
//!
//! Building candidates stay raw inside the extractor; [`normalise_building`] is applied by
//! whoever consumes the table.
//!
//! ## Example
//!
//! ```rust
//! use model_runs_extractor::{extract_runs, AnalysisCode, RunSource};
//!
//! let source = RunSource::new("batch-01", "deck.txt", "deck.txt");
//! let text = "TITLE=Reactor Building, Sizewell B, 1995\nSUBTITLE=Seismic Case\nNASTRAN\n";
//!
//! let runs = extract_runs(&source, text);
//! assert_eq!(runs.len(), 1);
//! assert_eq!(runs[0].subtitle.as_deref(), Some("Seismic Case"));
//! assert_eq!(runs[0].code, AnalysisCode::Nastran);
//! ```

mod enrich;
mod error;
mod extractor;
mod normalize;
mod patterns;
mod segment;
mod types;

pub use enrich::enrich_runs;
pub use error::{ExtractError, Result};
pub use extractor::{decode_lossy, extract_file, extract_runs, RunSource};
pub use normalize::{normalise_building, BuildingCategory};
pub use patterns::{is_valid_year, MAX_YEAR, MIN_YEAR};
pub use segment::segment_runs;
pub use types::{AnalysisCode, ModelRun, COLUMN_NAMES};
