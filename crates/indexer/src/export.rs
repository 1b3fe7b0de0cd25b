use crate::Result;
use model_runs_extractor::{ModelRun, COLUMN_NAMES};
use std::io::Write;
use std::path::Path;

/// Write `rows` as CSV with the table's column names as header.
///
/// Absent values are written as `empty_marker`.
pub fn write_csv<W: Write>(writer: W, rows: &[ModelRun], empty_marker: &str) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMN_NAMES)?;

    for run in rows {
        let year = run.year.map(|y| y.to_string());
        let optional = |value: Option<&str>| value.unwrap_or(empty_marker).to_string();
        csv.write_record([
            run.run_folder.clone(),
            run.file.clone(),
            run.rel_path.clone(),
            run.title.clone(),
            optional(run.subtitle.as_deref()),
            optional(run.label.as_deref()),
            optional(run.building.as_deref()),
            optional(run.station.as_deref()),
            optional(year.as_deref()),
            run.code.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write `rows` as CSV to `path`, replacing any existing file.
pub fn export_csv(path: &Path, rows: &[ModelRun], empty_marker: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), rows, empty_marker)?;
    log::info!("Exported {} runs to {}", rows.len(), path.display());
    Ok(())
}
