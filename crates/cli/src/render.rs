use model_runs_extractor::ModelRun;
use model_runs_indexer::{Facets, IndexStats, StaleAssessment, StaleReason};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const ABSENT: &str = "-";

fn or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT)
}

fn year_text(year: Option<u16>) -> String {
    year.map_or_else(|| ABSENT.to_string(), |y| y.to_string())
}

pub(crate) fn render_stats(stats: &IndexStats, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Indexed {} runs from {} files in {} folders ({source}, {} ms)",
        stats.runs, stats.files, stats.folders, stats.time_ms
    );
    if stats.files_skipped > 0 {
        let _ = writeln!(out, "Skipped {} unreadable files", stats.files_skipped);
    }
    for (code, count) in &stats.codes {
        let _ = writeln!(out, "  {code:<8} {count}");
    }
    out.trim_end().to_string()
}

pub(crate) fn reason_text(reason: &StaleReason) -> &'static str {
    match reason {
        StaleReason::SnapshotMissing => "snapshot missing",
        StaleReason::SnapshotCorrupt => "snapshot unreadable",
        StaleReason::WatermarkMissing => "snapshot has no watermark",
        StaleReason::RootMismatch => "snapshot built for another root",
        StaleReason::FilesystemChanged => "files changed since the snapshot",
    }
}

pub(crate) fn render_status(assessment: &StaleAssessment) -> String {
    if !assessment.stale {
        return "fresh".to_string();
    }
    let reasons: Vec<&str> = assessment.reasons.iter().map(reason_text).collect();
    format!("stale: {}", reasons.join(", "))
}

/// Aligned table of runs, one line per row
pub(crate) fn render_rows(rows: &[ModelRun]) -> String {
    let header = ["Folder", "Path", "Title", "Building", "Station", "Year", "Code"];
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|run| {
            [
                run.run_folder.clone(),
                run.rel_path.clone(),
                run.title.clone(),
                or_absent(run.building.as_deref()).to_string(),
                or_absent(run.station.as_deref()).to_string(),
                year_text(run.year),
                run.code.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(str::to_string), &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    let _ = write!(out, "{} runs", rows.len());
    out
}

fn push_row(out: &mut String, row: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Folders present in `rows` with their run counts
pub(crate) fn render_folders(rows: &[ModelRun]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for run in rows {
        *counts.entry(run.run_folder.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(folder, count)| format!("{folder}\t{count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read-only detail cards for one folder's runs
pub(crate) fn render_cards(folder: &str, rows: &[ModelRun]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{folder}: {} runs", rows.len());
    for run in rows {
        out.push('\n');
        let _ = writeln!(out, "[{}] {}", run.rel_path, run.title);
        let fields = [
            ("Subtitle", or_absent(run.subtitle.as_deref()).to_string()),
            ("Label", or_absent(run.label.as_deref()).to_string()),
            ("Building", or_absent(run.building.as_deref()).to_string()),
            ("Station", or_absent(run.station.as_deref()).to_string()),
            ("Year", year_text(run.year)),
            ("Code", run.code.to_string()),
        ];
        for (name, value) in fields {
            let _ = writeln!(out, "  {name:<9}{value}");
        }
    }
    out.trim_end().to_string()
}

pub(crate) fn render_facets(facets: &Facets) -> String {
    let list = |values: &[String]| {
        if values.is_empty() {
            ABSENT.to_string()
        } else {
            values.join(", ")
        }
    };
    let codes: Vec<String> = facets.codes.iter().map(ToString::to_string).collect();

    let mut out = String::new();
    let _ = writeln!(out, "Buildings: {}", list(&facets.buildings));
    let _ = writeln!(out, "Codes:     {}", list(&codes));
    let _ = writeln!(out, "Stations:  {}", list(&facets.stations));
    let _ = writeln!(out, "Folders:   {}", list(&facets.folders));
    let _ = write!(out, "Years:     {}-{}", facets.years.from, facets.years.to);
    out
}
