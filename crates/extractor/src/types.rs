use crate::extractor::RunSource;
use crate::normalize::normalise_building;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names of the flat run table, in table order.
pub const COLUMN_NAMES: [&str; 10] = [
    "RunFolder",
    "File",
    "RelPath",
    "Title",
    "Subtitle",
    "Label",
    "Building",
    "Station",
    "Year",
    "Code",
];

/// One analysis case opened by a `TITLE=` line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ModelRun {
    /// Name of the top-level source folder
    pub run_folder: String,

    /// Base name of the owning file
    pub file: String,

    /// Path of the owning file relative to the folder, `/` separated
    pub rel_path: String,

    /// Trimmed text after `TITLE=`
    pub title: String,

    /// First `SUBTITLE=` value inside this run's span
    pub subtitle: Option<String>,

    /// First `LABEL=` value inside this run's span
    pub label: Option<String>,

    /// Raw building candidate (not normalized)
    pub building: Option<String>,

    /// Raw station candidate
    pub station: Option<String>,

    /// Analysis year, always within 1980..=2029
    pub year: Option<u16>,

    /// Analysis software inferred from the file
    pub code: AnalysisCode,
}

impl ModelRun {
    /// Open a run for `title` with every inferred field unset
    pub fn new(source: &RunSource, title: impl Into<String>) -> Self {
        Self {
            run_folder: source.run_folder.clone(),
            file: source.file.clone(),
            rel_path: source.rel_path.clone(),
            title: title.into(),
            subtitle: None,
            label: None,
            building: None,
            station: None,
            year: None,
            code: AnalysisCode::Unknown,
        }
    }

    /// Copy of this run with the building mapped to its canonical category
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            building: normalise_building(self.building.as_deref()),
            ..self.clone()
        }
    }
}

/// Analysis software that produced a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnalysisCode {
    #[serde(rename = "NASTRAN")]
    Nastran,
    #[serde(rename = "ANSYS")]
    Ansys,
    #[serde(rename = "SASA")]
    Sasa,
    #[default]
    Unknown,
}

impl AnalysisCode {
    /// Named codes in detection priority order
    pub const DETECTABLE: [AnalysisCode; 3] =
        [AnalysisCode::Nastran, AnalysisCode::Ansys, AnalysisCode::Sasa];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nastran => "NASTRAN",
            Self::Ansys => "ANSYS",
            Self::Sasa => "SASA",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Move from `Unknown` to `code`; a named code is never replaced.
    pub fn escalate(&mut self, code: AnalysisCode) {
        if self.is_unknown() {
            *self = code;
        }
    }
}

impl fmt::Display for AnalysisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NASTRAN" => Ok(Self::Nastran),
            "ANSYS" => Ok(Self::Ansys),
            "SASA" => Ok(Self::Sasa),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(format!("unknown analysis code: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source() -> RunSource {
        RunSource::new("batch", "a.txt", "sub/a.txt")
    }

    #[test]
    fn new_run_starts_unknown_and_empty() {
        let run = ModelRun::new(&source(), "Case 1");
        assert_eq!(run.run_folder, "batch");
        assert_eq!(run.rel_path, "sub/a.txt");
        assert_eq!(run.code, AnalysisCode::Unknown);
        assert!(run.subtitle.is_none() && run.label.is_none());
        assert!(run.building.is_none() && run.station.is_none() && run.year.is_none());
    }

    #[test]
    fn escalate_never_resets_named_code() {
        let mut code = AnalysisCode::Unknown;
        code.escalate(AnalysisCode::Ansys);
        assert_eq!(code, AnalysisCode::Ansys);
        code.escalate(AnalysisCode::Nastran);
        assert_eq!(code, AnalysisCode::Ansys);
        code.escalate(AnalysisCode::Unknown);
        assert_eq!(code, AnalysisCode::Ansys);
    }

    #[test]
    fn code_parses_case_insensitively() {
        assert_eq!("nastran".parse::<AnalysisCode>(), Ok(AnalysisCode::Nastran));
        assert_eq!(" Unknown ".parse::<AnalysisCode>(), Ok(AnalysisCode::Unknown));
        assert!("abaqus".parse::<AnalysisCode>().is_err());
    }

    #[test]
    fn serializes_with_table_column_names() {
        let mut run = ModelRun::new(&source(), "Case 1");
        run.year = Some(1995);
        run.code = AnalysisCode::Sasa;
        let value = serde_json::to_value(&run).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for column in COLUMN_NAMES {
            assert!(keys.contains(&column), "missing column {column}");
        }
        assert_eq!(value["Code"], "SASA");
        assert_eq!(value["Year"], 1995);
        assert!(value["Subtitle"].is_null());
    }

    #[test]
    fn normalized_maps_building_only() {
        let mut run = ModelRun::new(&source(), "Case 1");
        run.building = Some("aux/control bldg".to_string());
        run.station = Some("SZB".to_string());
        let normalized = run.normalized();
        assert_eq!(
            normalized.building.as_deref(),
            Some("Auxiliary/Control Building")
        );
        assert_eq!(normalized.station.as_deref(), Some("SZB"));
        assert_eq!(run.building.as_deref(), Some("aux/control bldg"));
    }
}
