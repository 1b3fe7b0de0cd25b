use clap::Args;
use model_runs_extractor::AnalysisCode;
use model_runs_indexer::{RunFilter, YearRange};
use std::path::PathBuf;

/// Where the run tree and its snapshot live
#[derive(Args, Clone)]
pub(crate) struct SourceArgs {
    /// Scan root containing one directory per run folder
    #[arg(long, default_value = ".")]
    pub(crate) root: PathBuf,

    /// Snapshot file (overrides config and MODEL_RUNS_SNAPSHOT)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
pub(crate) struct FilterArgs {
    /// Keep runs in this building (repeatable; raw labels are normalized)
    #[arg(long = "building")]
    pub(crate) buildings: Vec<String>,

    /// Keep runs produced by this code (NASTRAN, ANSYS, SASA, Unknown)
    #[arg(long = "code")]
    pub(crate) codes: Vec<AnalysisCode>,

    /// Keep runs for this station (repeatable, case-insensitive)
    #[arg(long = "station")]
    pub(crate) stations: Vec<String>,

    /// Keep runs from one run folder
    #[arg(long)]
    pub(crate) folder: Option<String>,

    /// Earliest year (runs without a year are dropped when set)
    #[arg(long)]
    pub(crate) year_from: Option<u16>,

    /// Latest year (runs without a year are dropped when set)
    #[arg(long)]
    pub(crate) year_to: Option<u16>,
}

impl FilterArgs {
    pub(crate) fn to_filter(&self) -> RunFilter {
        RunFilter {
            buildings: self.buildings.clone(),
            codes: self.codes.clone(),
            stations: self.stations.clone(),
            folder: self.folder.clone(),
            years: YearRange::from_bounds(self.year_from, self.year_to),
        }
    }
}
