use crate::{IndexerError, Result};
use model_runs_extractor::{AnalysisCode, ModelRun};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Flat table of runs, one row per run, in build order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTable {
    rows: Vec<ModelRun>,
}

impl RunTable {
    pub fn new(rows: Vec<ModelRun>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ModelRun] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelRun> {
        self.rows.iter()
    }

    /// Distinct folder names, sorted
    pub fn folders(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|run| run.run_folder.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn to_columns(&self) -> RunColumns {
        let mut columns = RunColumns::with_capacity(self.rows.len());
        for run in &self.rows {
            columns.push(run);
        }
        columns
    }

    /// Rebuild rows from columns; every column must have the same length.
    pub fn from_columns(columns: RunColumns) -> Result<Self> {
        columns.check_lengths()?;
        let RunColumns {
            run_folder,
            file,
            rel_path,
            title,
            subtitle,
            label,
            building,
            station,
            year,
            code,
        } = columns;

        let mut subtitle = subtitle.into_iter();
        let mut label = label.into_iter();
        let mut building = building.into_iter();
        let mut station = station.into_iter();
        let mut year = year.into_iter();
        let mut code = code.into_iter();

        let mut rows = Vec::with_capacity(run_folder.len());
        for (((run_folder, file), rel_path), title) in run_folder
            .into_iter()
            .zip(file)
            .zip(rel_path)
            .zip(title)
        {
            rows.push(ModelRun {
                run_folder,
                file,
                rel_path,
                title,
                subtitle: subtitle.next().flatten(),
                label: label.next().flatten(),
                building: building.next().flatten(),
                station: station.next().flatten(),
                year: year.next().flatten(),
                code: code.next().unwrap_or_default(),
            });
        }
        Ok(Self { rows })
    }
}

/// Column-per-field layout of a [`RunTable`] used by the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunColumns {
    pub run_folder: Vec<String>,
    pub file: Vec<String>,
    pub rel_path: Vec<String>,
    pub title: Vec<String>,
    pub subtitle: Vec<Option<String>>,
    pub label: Vec<Option<String>>,
    pub building: Vec<Option<String>>,
    pub station: Vec<Option<String>>,
    pub year: Vec<Option<u16>>,
    pub code: Vec<AnalysisCode>,
}

impl RunColumns {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            run_folder: Vec::with_capacity(capacity),
            file: Vec::with_capacity(capacity),
            rel_path: Vec::with_capacity(capacity),
            title: Vec::with_capacity(capacity),
            subtitle: Vec::with_capacity(capacity),
            label: Vec::with_capacity(capacity),
            building: Vec::with_capacity(capacity),
            station: Vec::with_capacity(capacity),
            year: Vec::with_capacity(capacity),
            code: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, run: &ModelRun) {
        self.run_folder.push(run.run_folder.clone());
        self.file.push(run.file.clone());
        self.rel_path.push(run.rel_path.clone());
        self.title.push(run.title.clone());
        self.subtitle.push(run.subtitle.clone());
        self.label.push(run.label.clone());
        self.building.push(run.building.clone());
        self.station.push(run.station.clone());
        self.year.push(run.year);
        self.code.push(run.code);
    }

    pub fn len(&self) -> usize {
        self.run_folder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_folder.is_empty()
    }

    fn check_lengths(&self) -> Result<()> {
        let expected = self.len();
        let lengths = [
            ("File", self.file.len()),
            ("RelPath", self.rel_path.len()),
            ("Title", self.title.len()),
            ("Subtitle", self.subtitle.len()),
            ("Label", self.label.len()),
            ("Building", self.building.len()),
            ("Station", self.station.len()),
            ("Year", self.year.len()),
            ("Code", self.code.len()),
        ];
        for (name, len) in lengths {
            if len != expected {
                return Err(IndexerError::SnapshotSchema(format!(
                    "column {name} has {len} values, RunFolder has {expected}"
                )));
            }
        }
        if let Some(year) = self
            .year
            .iter()
            .flatten()
            .find(|year| !model_runs_extractor::is_valid_year(**year))
        {
            return Err(IndexerError::SnapshotSchema(format!(
                "year {year} outside the accepted range"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_runs_extractor::RunSource;
    use pretty_assertions::assert_eq;

    fn sample() -> RunTable {
        let source = RunSource::new("b-run", "deck.txt", "sub/deck.txt");
        let mut first = ModelRun::new(&source, "Case 1");
        first.subtitle = Some("Seismic".into());
        first.year = Some(1995);
        first.code = AnalysisCode::Nastran;
        let mut second = ModelRun::new(&RunSource::new("a-run", "x.txt", "x.txt"), "Case 2");
        second.building = Some("RB".into());
        RunTable::new(vec![first, second])
    }

    #[test]
    fn columns_round_trip_rows() {
        let table = sample();
        let columns = table.to_columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.year, vec![Some(1995), None]);
        assert_eq!(RunTable::from_columns(columns).unwrap(), table);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let mut columns = sample().to_columns();
        columns.label.pop();
        let err = RunTable::from_columns(columns).unwrap_err();
        assert!(matches!(err, IndexerError::SnapshotSchema(_)));
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        let mut columns = sample().to_columns();
        columns.year[1] = Some(2099);
        assert!(RunTable::from_columns(columns).is_err());
    }

    #[test]
    fn folders_are_distinct_and_sorted() {
        assert_eq!(
            sample().folders(),
            vec!["a-run".to_string(), "b-run".to_string()]
        );
    }
}
