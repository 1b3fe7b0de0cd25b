use crate::scanner::FolderScanner;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::max;
use std::time::{SystemTime, UNIX_EPOCH};

/// Cheap fingerprint of the scanned files under a root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Watermark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_at_unix_ms: Option<u64>,
    pub folder_count: u64,
    pub file_count: u64,
    pub max_mtime_ms: u64,
    pub total_bytes: u64,
}

impl Watermark {
    /// Same files, sizes and newest modification time; `computed_at_unix_ms` is ignored.
    pub fn same_content(&self, other: &Watermark) -> bool {
        self.folder_count == other.folder_count
            && self.file_count == other.file_count
            && self.max_mtime_ms == other.max_mtime_ms
            && self.total_bytes == other.total_bytes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    SnapshotMissing,
    SnapshotCorrupt,
    WatermarkMissing,
    RootMismatch,
    FilesystemChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaleAssessment {
    pub stale: bool,
    pub reasons: Vec<StaleReason>,
}

/// Walk every folder the index would scan and fingerprint its files.
///
/// Fails only when the root itself cannot be listed.
pub fn compute_watermark(scanner: &FolderScanner) -> Result<Watermark> {
    let folders = scanner.folders()?;

    let mut file_count = 0u64;
    let mut total_bytes = 0u64;
    let mut max_mtime_ms = 0u64;

    for folder in &folders {
        for path in scanner.text_files(&folder.path) {
            file_count += 1;
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            total_bytes = total_bytes.saturating_add(meta.len());
            if let Ok(modified) = meta.modified() {
                max_mtime_ms = max(max_mtime_ms, system_time_ms(modified));
            }
        }
    }

    Ok(Watermark {
        computed_at_unix_ms: Some(unix_now_ms()),
        folder_count: folders.len() as u64,
        file_count,
        max_mtime_ms,
        total_bytes,
    })
}

#[must_use]
pub fn assess_staleness(
    current: &Watermark,
    snapshot_exists: bool,
    snapshot_corrupt: bool,
    snapshot_watermark: Option<&Watermark>,
) -> StaleAssessment {
    let mut reasons = Vec::new();

    if !snapshot_exists {
        reasons.push(StaleReason::SnapshotMissing);
    }
    if snapshot_corrupt {
        reasons.push(StaleReason::SnapshotCorrupt);
    }

    match snapshot_watermark {
        None => {
            if snapshot_exists && !snapshot_corrupt {
                reasons.push(StaleReason::WatermarkMissing);
            }
        }
        Some(mark) => {
            if !mark.same_content(current) {
                reasons.push(StaleReason::FilesystemChanged);
            }
        }
    }

    let stale = !reasons.is_empty();
    StaleAssessment { stale, reasons }
}

fn system_time_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

pub(crate) fn unix_now_ms() -> u64 {
    system_time_ms(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndexerConfig;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn mark(files: u64, max_mtime_ms: u64, bytes: u64) -> Watermark {
        Watermark {
            computed_at_unix_ms: None,
            folder_count: 1,
            file_count: files,
            max_mtime_ms,
            total_bytes: bytes,
        }
    }

    #[test]
    fn stale_when_snapshot_missing() {
        let out = assess_staleness(&mark(1, 1, 1), false, false, None);
        assert_eq!(out.stale, true);
        assert_eq!(out.reasons, vec![StaleReason::SnapshotMissing]);
    }

    #[test]
    fn stale_when_snapshot_corrupt() {
        let out = assess_staleness(&mark(1, 1, 1), true, true, None);
        assert_eq!(out.reasons, vec![StaleReason::SnapshotCorrupt]);
    }

    #[test]
    fn stale_when_watermark_missing() {
        let out = assess_staleness(&mark(1, 1, 1), true, false, None);
        assert_eq!(out.reasons, vec![StaleReason::WatermarkMissing]);
    }

    #[test]
    fn stale_when_filesystem_changed() {
        let out = assess_staleness(&mark(10, 123, 50), true, false, Some(&mark(10, 124, 50)));
        assert_eq!(out.stale, true);
        assert_eq!(out.reasons, vec![StaleReason::FilesystemChanged]);
    }

    #[test]
    fn fresh_when_equal_ignoring_computed_at() {
        let mut earlier = mark(10, 123, 50);
        earlier.computed_at_unix_ms = Some(1);
        let out = assess_staleness(&mark(10, 123, 50), true, false, Some(&earlier));
        assert_eq!(out.stale, false);
        assert_eq!(out.reasons, Vec::<StaleReason>::new());
    }

    #[test]
    fn watermark_counts_scanned_files_only() {
        let temp = tempdir().unwrap();
        let folder = temp.path().join("run");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("a.txt"), b"12345").unwrap();
        fs::write(folder.join("b.bin"), b"ignored").unwrap();

        let scanner = FolderScanner::new(temp.path(), &IndexerConfig::default());
        let first = compute_watermark(&scanner).unwrap();
        assert_eq!(first.folder_count, 1);
        assert_eq!(first.file_count, 1);
        assert_eq!(first.total_bytes, 5);

        fs::write(folder.join("a.txt"), b"1234567").unwrap();
        let second = compute_watermark(&scanner).unwrap();
        assert!(!first.same_content(&second));
    }
}
