//! Pass 2: backfill fields the titles left unset from the whole file's text.

use crate::patterns::{find_dated_year, find_year, BUILDING_RE, STATION_RE};
use crate::types::{AnalysisCode, ModelRun};

/// Facts found in one file's full text, computed once and shared by all of its runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FileFacts {
    code: Option<AnalysisCode>,
    building: Option<String>,
    station: Option<String>,
    year: Option<u16>,
}

impl FileFacts {
    fn scan(content: &str) -> Self {
        Self {
            code: detect_code(content),
            building: BUILDING_RE.find(content).map(|m| m.as_str().to_string()),
            station: STATION_RE.find(content).map(|m| m.as_str().to_string()),
            year: find_dated_year(content).or_else(|| find_year(content)),
        }
    }
}

/// Fill `Code`, `Building`, `Station` and `Year` on every run still missing them.
///
/// The whole `content` of the file is used for every run, so runs sharing a file receive the
/// same backfilled values. Fields already set are left untouched.
pub fn enrich_runs(runs: &mut [ModelRun], content: &str) {
    if runs.is_empty() {
        return;
    }

    let facts = FileFacts::scan(content);
    for run in runs.iter_mut() {
        if let Some(code) = facts.code {
            run.code.escalate(code);
        }
        if run.building.is_none() {
            run.building = facts.building.clone();
        }
        if run.station.is_none() {
            run.station = facts.station.clone();
        }
        if run.year.is_none() {
            run.year = facts.year;
        }
    }
}

fn detect_code(content: &str) -> Option<AnalysisCode> {
    let upper = content.to_uppercase();
    AnalysisCode::DETECTABLE
        .into_iter()
        .find(|code| upper.contains(code.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::RunSource;
    use pretty_assertions::assert_eq;

    fn run(title: &str) -> ModelRun {
        ModelRun::new(&RunSource::new("batch", "a.txt", "a.txt"), title)
    }

    #[test]
    fn backfills_code_building_and_year() {
        let mut runs = vec![run("Plain case")];
        enrich_runs(
            &mut runs,
            "SOL 101 NASTRAN deck\nModel of the Control Building\nchecked 2003\n",
        );
        assert_eq!(runs[0].code, AnalysisCode::Nastran);
        assert_eq!(runs[0].building.as_deref(), Some("Control Building"));
        assert_eq!(runs[0].year, Some(2003));
        assert_eq!(runs[0].station, None);
    }

    #[test]
    fn code_priority_is_nastran_then_ansys_then_sasa() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "sasa output\nansys input\n");
        assert_eq!(runs[0].code, AnalysisCode::Ansys);

        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "sasa\nansys\nMSC/Nastran\n");
        assert_eq!(runs[0].code, AnalysisCode::Nastran);
    }

    #[test]
    fn named_code_is_kept() {
        let mut runs = vec![run("a")];
        runs[0].code = AnalysisCode::Sasa;
        enrich_runs(&mut runs, "NASTRAN");
        assert_eq!(runs[0].code, AnalysisCode::Sasa);
    }

    #[test]
    fn existing_fields_are_not_overwritten() {
        let mut runs = vec![run("a")];
        runs[0].building = Some("Fuel Building".into());
        runs[0].station = Some("Sizewell B".into());
        runs[0].year = Some(1988);
        enrich_runs(&mut runs, "REACTOR BUILDING at SZB, 2001");
        assert_eq!(runs[0].building.as_deref(), Some("Fuel Building"));
        assert_eq!(runs[0].station.as_deref(), Some("Sizewell B"));
        assert_eq!(runs[0].year, Some(1988));
    }

    #[test]
    fn building_and_station_are_verbatim_matches() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "see the rb model at sizewell\n");
        assert_eq!(runs[0].building.as_deref(), Some("rb"));
        assert_eq!(runs[0].station.as_deref(), Some("sizewell"));
    }

    #[test]
    fn abbreviations_inside_words_do_not_match() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "turbine hall, planted trees\n");
        assert_eq!(runs[0].building, None);
        assert_eq!(runs[0].station, None);
    }

    #[test]
    fn dated_year_wins_over_earlier_bare_year() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "model ref 1984\nissued March 12, 1999\n");
        assert_eq!(runs[0].year, Some(1999));
    }

    #[test]
    fn bare_year_is_fallback() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "built 1850\nreissued 2012\n");
        assert_eq!(runs[0].year, Some(2012));
    }

    #[test]
    fn out_of_range_years_stay_unset() {
        let mut runs = vec![run("a")];
        enrich_runs(&mut runs, "dated Jan 4, 1850 and 2099\n");
        assert_eq!(runs[0].year, None);
    }

    #[test]
    fn every_run_of_a_file_gets_the_same_backfill() {
        let mut runs = vec![run("a"), run("b")];
        enrich_runs(&mut runs, "ANSYS\nAUXILIARY BUILDING\nPLANT\n1990\n");
        assert_eq!(runs[0].code, runs[1].code);
        assert_eq!(runs[0].building, runs[1].building);
        assert_eq!(runs[0].station, runs[1].station);
        assert_eq!(runs[0].year, runs[1].year);
        assert_eq!(runs[1].building.as_deref(), Some("AUXILIARY BUILDING"));
    }
}
