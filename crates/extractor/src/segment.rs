//! Pass 1: split a file's lines into runs.
//!
//! Segmentation is a fold over a two-state machine. A `TITLE=` line seals the open run (if any)
//! and opens a new one; every other line can only fill the open run's `Subtitle` or `Label`,
//! first value wins.

use crate::extractor::RunSource;
use crate::patterns::{find_year, BUILDING_KEYWORD, STATION_KEYWORDS, TITLE_RE};
use crate::types::ModelRun;

#[derive(Debug)]
enum RunState {
    NoOpenRun,
    OpenRun(ModelRun),
}

#[derive(Debug)]
struct Segmenter<'a> {
    source: &'a RunSource,
    sealed: Vec<ModelRun>,
    state: RunState,
}

impl<'a> Segmenter<'a> {
    fn new(source: &'a RunSource) -> Self {
        Self {
            source,
            sealed: Vec::new(),
            state: RunState::NoOpenRun,
        }
    }

    fn feed(mut self, line: &str) -> Self {
        let line = line.trim();
        if let Some(title) = TITLE_RE.captures(line).and_then(|caps| caps.get(1)) {
            self.seal();
            self.state = RunState::OpenRun(open_run(self.source, title.as_str().trim()));
        } else if let RunState::OpenRun(run) = &mut self.state {
            attach_header_field(run, line);
        }
        self
    }

    fn seal(&mut self) {
        if let RunState::OpenRun(run) = std::mem::replace(&mut self.state, RunState::NoOpenRun) {
            self.sealed.push(run);
        }
    }

    fn finish(mut self) -> Vec<ModelRun> {
        self.seal();
        self.sealed
    }
}

/// Segment `lines` into runs, one per `TITLE=` line, in line order.
///
/// Only title-derived fields and `Subtitle`/`Label` are filled here; see
/// [`enrich_runs`](crate::enrich_runs) for the whole-file backfill.
pub fn segment_runs<'l, I>(source: &RunSource, lines: I) -> Vec<ModelRun>
where
    I: IntoIterator<Item = &'l str>,
{
    lines
        .into_iter()
        .fold(Segmenter::new(source), Segmenter::feed)
        .finish()
}

fn open_run(source: &RunSource, title: &str) -> ModelRun {
    let mut run = ModelRun::new(source, title);

    for part in title.split(',').map(str::trim) {
        let upper = part.to_uppercase();
        if run.building.is_none() && upper.contains(BUILDING_KEYWORD) {
            run.building = Some(part.to_string());
        }
        if run.station.is_none() && STATION_KEYWORDS.iter().any(|kw| upper.contains(kw)) {
            run.station = Some(part.to_string());
        }
    }

    run.year = find_year(title);
    run
}

fn attach_header_field(run: &mut ModelRun, line: &str) {
    let upper = line.to_uppercase();
    if upper.contains("SUBTITLE=") && run.subtitle.is_none() {
        run.subtitle = value_after_equals(line);
    } else if upper.contains("LABEL=") && run.label.is_none() {
        run.label = value_after_equals(line);
    }
}

fn value_after_equals(line: &str) -> Option<String> {
    line.split_once('=')
        .map(|(_, value)| value.trim().to_string())
}
