use crate::table::RunTable;
use model_runs_extractor::{normalise_building, AnalysisCode, ModelRun};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Year span reported when no row carries a year
pub const DEFAULT_YEAR_SPAN: YearRange = YearRange {
    from: 1980,
    to: 2025,
};

/// Inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: u16,
    pub to: u16,
}

impl YearRange {
    /// Range from two optional bounds, each defaulting to the open end
    pub fn from_bounds(from: Option<u16>, to: Option<u16>) -> Option<Self> {
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(Self {
            from: from.unwrap_or(u16::MIN),
            to: to.unwrap_or(u16::MAX),
        })
    }

    pub fn contains(&self, year: u16) -> bool {
        self.from <= year && year <= self.to
    }
}

/// Row filter applied after building normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Canonical building names; raw labels are normalized before comparing
    pub buildings: Vec<String>,
    pub codes: Vec<AnalysisCode>,
    pub stations: Vec<String>,
    pub folder: Option<String>,
    /// Rows without a year never match a range
    pub years: Option<YearRange>,
}

impl RunFilter {
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
            && self.codes.is_empty()
            && self.stations.is_empty()
            && self.folder.is_none()
            && self.years.is_none()
    }

    /// Normalized rows of `table` that pass every criterion, in table order
    pub fn apply(&self, table: &RunTable) -> Vec<ModelRun> {
        let buildings: Vec<String> = self
            .buildings
            .iter()
            .filter_map(|b| normalise_building(Some(b)))
            .collect();

        table
            .iter()
            .map(ModelRun::normalized)
            .filter(|run| self.matches_normalized(run, &buildings))
            .collect()
    }

    fn matches_normalized(&self, run: &ModelRun, buildings: &[String]) -> bool {
        if !buildings.is_empty()
            && !run
                .building
                .as_ref()
                .is_some_and(|b| buildings.contains(b))
        {
            return false;
        }
        if !self.codes.is_empty() && !self.codes.contains(&run.code) {
            return false;
        }
        if !self.stations.is_empty()
            && !run
                .station
                .as_ref()
                .is_some_and(|s| self.stations.iter().any(|want| want.eq_ignore_ascii_case(s)))
        {
            return false;
        }
        if let Some(folder) = &self.folder {
            if &run.run_folder != folder {
                return false;
            }
        }
        if let Some(range) = &self.years {
            if !run.year.is_some_and(|year| range.contains(year)) {
                return false;
            }
        }
        true
    }
}

/// Distinct values available for filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub buildings: Vec<String>,
    pub codes: Vec<AnalysisCode>,
    pub stations: Vec<String>,
    pub folders: Vec<String>,
    pub years: YearRange,
}

impl Facets {
    /// Facets over `rows`, which are expected to be normalized already
    pub fn from_rows(rows: &[ModelRun]) -> Self {
        let buildings: BTreeSet<&str> = rows.iter().filter_map(|r| r.building.as_deref()).collect();
        let codes: BTreeSet<AnalysisCode> = rows.iter().map(|r| r.code).collect();
        let stations: BTreeSet<&str> = rows.iter().filter_map(|r| r.station.as_deref()).collect();
        let folders: BTreeSet<&str> = rows.iter().map(|r| r.run_folder.as_str()).collect();

        let years = rows.iter().filter_map(|r| r.year);
        let years = match (years.clone().min(), years.max()) {
            (Some(from), Some(to)) => YearRange { from, to },
            _ => DEFAULT_YEAR_SPAN,
        };

        Self {
            buildings: buildings.into_iter().map(str::to_string).collect(),
            codes: codes.into_iter().collect(),
            stations: stations.into_iter().map(str::to_string).collect(),
            folders: folders.into_iter().map(str::to_string).collect(),
            years,
        }
    }

    pub fn from_table(table: &RunTable) -> Self {
        let rows: Vec<ModelRun> = table.iter().map(ModelRun::normalized).collect();
        Self::from_rows(&rows)
    }
}
