use model_runs_indexer::{IndexCache, IndexSource, IndexerConfig, StaleReason};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

async fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().join("model_runs");
    tokio::fs::create_dir_all(root.join("batch-01"))
        .await
        .expect("create folder");
    tokio::fs::write(
        root.join("batch-01").join("deck.txt"),
        "TITLE=Fuel Building, SZB, 1991\nSASA\n",
    )
    .await
    .expect("write deck");
    let snapshot = temp.path().join("model_index.json");
    (temp, root, snapshot)
}

fn cache(root: &std::path::Path, snapshot: &std::path::Path) -> IndexCache {
    IndexCache::new(root, snapshot, IndexerConfig::default()).expect("cache")
}

#[tokio::test]
async fn first_get_rebuilds_then_memory_is_reused() {
    let (_temp, root, snapshot) = setup().await;
    let cache = cache(&root, &snapshot);

    let first = cache.get().await.expect("first get");
    assert_eq!(first.source, IndexSource::Rebuilt);
    assert_eq!(first.stale_reasons, vec![StaleReason::SnapshotMissing]);
    assert_eq!(first.table.len(), 1);
    assert!(snapshot.exists());

    let second = cache.get().await.expect("second get");
    assert_eq!(second.source, IndexSource::Memory);
    assert!(Arc::ptr_eq(&first.table, &second.table));
}

#[tokio::test]
async fn fresh_snapshot_is_reused_by_a_new_cache() {
    let (_temp, root, snapshot) = setup().await;
    let built = cache(&root, &snapshot).get().await.expect("build");

    let other = cache(&root, &snapshot);
    assert!(!other.status().await.expect("status").stale);
    let loaded = other.get().await.expect("load");
    assert_eq!(loaded.source, IndexSource::Snapshot);
    assert_eq!(*loaded.table, *built.table);
    assert_eq!(loaded.stats, built.stats);
}

#[tokio::test]
async fn changed_files_make_the_snapshot_stale() {
    let (_temp, root, snapshot) = setup().await;
    let cache = cache(&root, &snapshot);
    cache.get().await.expect("build");

    tokio::fs::write(
        root.join("batch-01").join("deck.txt"),
        "TITLE=Fuel Building, SZB, 1991\nSASA\nTITLE=Diesel Building, SXB, 1992\n",
    )
    .await
    .expect("rewrite deck");

    let status = cache.status().await.expect("status");
    assert!(status.stale);
    assert_eq!(status.reasons, vec![StaleReason::FilesystemChanged]);

    let reloaded = cache.get().await.expect("reload");
    assert_eq!(reloaded.source, IndexSource::Rebuilt);
    assert_eq!(reloaded.table.len(), 2);
    assert!(!cache.status().await.expect("status").stale);
}

#[tokio::test]
async fn invalidate_drops_memory_but_keeps_snapshot() {
    let (_temp, root, snapshot) = setup().await;
    let cache = cache(&root, &snapshot);
    cache.get().await.expect("build");

    cache.invalidate().await;
    let loaded = cache.get().await.expect("reload");
    assert_eq!(loaded.source, IndexSource::Snapshot);
}

#[tokio::test]
async fn explicit_rebuild_always_rescans() {
    let (_temp, root, snapshot) = setup().await;
    let cache = cache(&root, &snapshot);
    cache.get().await.expect("build");

    let rebuilt = cache.rebuild().await.expect("rebuild");
    assert_eq!(rebuilt.source, IndexSource::Rebuilt);
    assert!(rebuilt.stale_reasons.is_empty());
}

#[tokio::test]
async fn corrupt_snapshot_triggers_rebuild() {
    let (_temp, root, snapshot) = setup().await;
    tokio::fs::write(&snapshot, b"{not json")
        .await
        .expect("write garbage");

    let cache = cache(&root, &snapshot);
    let loaded = cache.get().await.expect("get");
    assert_eq!(loaded.source, IndexSource::Rebuilt);
    assert_eq!(loaded.stale_reasons, vec![StaleReason::SnapshotCorrupt]);
    assert_eq!(loaded.table.len(), 1);
}
