use crate::{IndexerConfig, IndexerError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A top-level directory under the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFolder {
    pub name: String,
    pub path: PathBuf,
}

/// Scanner for finding run folders and their text files
#[derive(Debug, Clone)]
pub struct FolderScanner {
    root: PathBuf,
    extensions: Vec<String>,
    max_file_size_bytes: u64,
}

impl FolderScanner {
    pub fn new(root: impl AsRef<Path>, config: &IndexerConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Immediate subdirectories of the root, sorted by name
    pub fn folders(&self) -> Result<Vec<RunFolder>> {
        let entries = std::fs::read_dir(&self.root).map_err(|err| {
            IndexerError::InvalidPath(format!("{}: {err}", self.root.display()))
        })?;

        let mut folders = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry under {}: {e}", self.root.display());
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            folders.push(RunFolder {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }

        folders.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!(
            "Found {} run folders under {}",
            folders.len(),
            self.root.display()
        );
        Ok(folders)
    }

    /// Text files anywhere below `folder`, in sorted walk order.
    ///
    /// Symlinks are listed without being followed so that a dangling link surfaces as a read
    /// failure of that one file.
    pub fn text_files(&self, folder: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for result in WalkDir::new(folder)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };

            let file_type = entry.file_type();
            if !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }

            let path = entry.path();
            if !self.has_scanned_extension(path) {
                continue;
            }

            if file_type.is_file() {
                if let Ok(meta) = entry.metadata() {
                    if meta.len() > self.max_file_size_bytes {
                        log::debug!(
                            "Skipping large file {} ({} bytes > {})",
                            path.display(),
                            meta.len(),
                            self.max_file_size_bytes
                        );
                        continue;
                    }
                }
            }

            files.push(path.to_path_buf());
        }

        files
    }

    fn has_scanned_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.extensions.iter().any(|candidate| candidate == &ext))
    }
}
