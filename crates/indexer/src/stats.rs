use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about an index build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of run folders scanned
    pub folders: usize,

    /// Number of files that were read and extracted
    pub files: usize,

    /// Number of files skipped after a read failure
    pub files_skipped: usize,

    /// Number of runs in the table
    pub runs: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Runs per analysis code
    pub codes: BTreeMap<String, usize>,

    /// Errors encountered
    pub errors: Vec<String>,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, runs: &[model_runs_extractor::ModelRun]) {
        self.files += 1;
        self.runs += runs.len();
        for run in runs {
            *self.codes.entry(run.code.to_string()).or_insert(0) += 1;
        }
    }

    pub fn add_skipped(&mut self, error: String) {
        self.files_skipped += 1;
        self.errors.push(error);
    }

    pub fn merge(&mut self, other: IndexStats) {
        self.folders += other.folders;
        self.files += other.files;
        self.files_skipped += other.files_skipped;
        self.runs += other.runs;
        for (code, count) in other.codes {
            *self.codes.entry(code).or_insert(0) += count;
        }
        self.errors.extend(other.errors);
    }
}
