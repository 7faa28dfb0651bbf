//! File-backed snapshot log: the full append-only history as one JSON
//! document. The append-only model is the contract; the file is just its
//! materialization, rewritten on every append so any historical state
//! stays independently rehydratable.

use super::{SnapshotStore, StoreError, StoreResult};
use crate::fs::FileSystem;
use crate::model::{epoch_now, GraphSnapshot, RawGraph, SnapshotMeta};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct JsonSnapshotLog {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    snapshots: RwLock<Vec<GraphSnapshot>>,
}

impl JsonSnapshotLog {
    /// Open a log at `path`, loading any existing history. A missing file
    /// is an empty log; an unreadable one is an error.
    pub fn open(path: PathBuf, fs: Arc<dyn FileSystem>) -> StoreResult<Self> {
        let snapshots = if fs.exists(&path) {
            let content = fs
                .read_to_string(&path)
                .map_err(|e| StoreError::Io(e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| StoreError::Io(e.to_string()))?
        } else {
            if let Some(parent) = path.parent() {
                fs.create_dir_all(parent)
                    .map_err(|e| StoreError::Io(e.to_string()))?;
            }
            Vec::new()
        };

        info!(path = %path.display(), count = snapshots.len(), "opened snapshot log");
        Ok(Self {
            path,
            fs,
            snapshots: RwLock::new(snapshots),
        })
    }

    fn persist(&self, snapshots: &[GraphSnapshot]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(snapshots)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        self.fs
            .write(&self.path, &json)
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotLog {
    async fn latest(&self) -> StoreResult<Option<GraphSnapshot>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .iter()
            .max_by_key(|s| (s.timestamp, s.id))
            .cloned())
    }

    async fn append(
        &self,
        uploader_id: &str,
        filename: &str,
        content: RawGraph,
    ) -> StoreResult<GraphSnapshot> {
        let mut snapshots = self.snapshots.write().await;

        let snapshot = GraphSnapshot {
            id: snapshots.iter().map(|s| s.id + 1).max().unwrap_or(0),
            uploader_id: uploader_id.to_string(),
            filename: filename.to_string(),
            content,
            timestamp: epoch_now(),
        };

        snapshots.push(snapshot.clone());
        self.persist(&snapshots)?;
        Ok(snapshot)
    }

    async fn list_metadata(&self) -> StoreResult<Vec<SnapshotMeta>> {
        let snapshots = self.snapshots.read().await;
        let mut metas: Vec<SnapshotMeta> = snapshots.iter().map(|s| s.meta()).collect();
        metas.sort_by_key(|m| std::cmp::Reverse((m.timestamp, m.id)));
        Ok(metas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::model::RawNode;

    fn content(ids: &[&str]) -> RawGraph {
        RawGraph {
            nodes: ids.iter().map(|id| RawNode::new(*id, *id)).collect(),
            edges: vec![],
        }
    }

    #[tokio::test]
    async fn test_append_then_reopen_preserves_history() {
        let fs = Arc::new(MockFs::new());
        let path = PathBuf::from("/data/snapshots.json");

        let log = JsonSnapshotLog::open(path.clone(), fs.clone()).unwrap();
        log.append("admin", "a.json", content(&["a"])).await.unwrap();
        log.append("admin", "b.json", content(&["a", "b"]))
            .await
            .unwrap();

        // Reopen from the same backing file.
        let reopened = JsonSnapshotLog::open(path, fs).unwrap();
        let metas = reopened.list_metadata().await.unwrap();
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].filename, "b.json");
        assert_eq!(metas[0].node_count, 2);

        let latest = reopened.latest().await.unwrap().unwrap();
        assert_eq!(latest.content.nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_log_is_an_error_not_a_reset() {
        let fs = Arc::new(MockFs::with_files([("/data/snapshots.json", "not json")]));
        let result = JsonSnapshotLog::open(PathBuf::from("/data/snapshots.json"), fs);
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
