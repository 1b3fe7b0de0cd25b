use crate::enrich::enrich_runs;
use crate::error::{ExtractError, Result};
use crate::segment::segment_runs;
use crate::types::ModelRun;
use std::path::{Component, Path};

/// Identity of the file a run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSource {
    pub run_folder: String,
    pub file: String,
    pub rel_path: String,
}

impl RunSource {
    pub fn new(
        run_folder: impl Into<String>,
        file: impl Into<String>,
        rel_path: impl Into<String>,
    ) -> Self {
        Self {
            run_folder: run_folder.into(),
            file: file.into(),
            rel_path: rel_path.into(),
        }
    }

    /// Build the identity of `path`, which must live under `folder_root`.
    pub fn for_path(folder_root: &Path, path: &Path) -> Result<Self> {
        let run_folder = folder_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ExtractError::invalid_path(format!(
                    "folder has no name: {}",
                    folder_root.display()
                ))
            })?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ExtractError::invalid_path(format!("file has no name: {}", path.display()))
            })?;
        let relative = path.strip_prefix(folder_root).map_err(|_| {
            ExtractError::invalid_path(format!(
                "{} is not under {}",
                path.display(),
                folder_root.display()
            ))
        })?;

        Ok(Self::new(run_folder, file, normalize_rel_path(relative)))
    }
}

fn normalize_rel_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode file bytes as UTF-8, dropping anything that does not decode.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Extract every run from the text of one file.
///
/// Segmentation runs over the lines of `content`, where `\n`, `\r\n` and a bare `\r` all end a
/// line; the enrichment pass then sees `content` as a whole.
#[must_use]
pub fn extract_runs(source: &RunSource, content: &str) -> Vec<ModelRun> {
    let mut runs = segment_runs(source, content.split(['\r', '\n']));
    enrich_runs(&mut runs, content);
    runs
}

/// Read `path` and extract its runs.
///
/// Read failures are returned so the caller can skip the file; nothing is extracted from a file
/// that could not be read in full.
pub fn extract_file(folder_root: &Path, path: &Path) -> Result<Vec<ModelRun>> {
    let source = RunSource::for_path(folder_root, path)?;
    let bytes = std::fs::read(path)?;
    let content = decode_lossy(&bytes);
    let runs = extract_runs(&source, &content);
    log::debug!("Extracted {} runs from {}", runs.len(), path.display());
    Ok(runs)
}
