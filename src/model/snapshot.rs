use super::raw::RawGraph;
use serde::{Deserialize, Serialize};

/// One immutable recorded version of the full graph content. Snapshots are
/// append-only; the active graph is always the one with the newest
/// timestamp. Every edit materializes a brand-new snapshot rather than
/// patching an existing one, so any historical state rehydrates on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub id: u64,
    pub uploader_id: String,
    pub filename: String,
    /// Raw, pre-normalization content.
    pub content: RawGraph,
    /// Epoch seconds.
    pub timestamp: u64,
}

/// Content-excluded snapshot listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotMeta {
    pub id: u64,
    pub uploader_id: String,
    pub filename: String,
    pub timestamp: u64,
    pub node_count: usize,
    pub edge_count: usize,
}

impl GraphSnapshot {
    pub fn meta(&self) -> SnapshotMeta {
        SnapshotMeta {
            id: self.id,
            uploader_id: self.uploader_id.clone(),
            filename: self.filename.clone(),
            timestamp: self.timestamp,
            node_count: self.content.nodes.len(),
            edge_count: self.content.edges.len(),
        }
    }
}

/// Simple timestamp function (no chrono dependency)
pub fn epoch_now() -> u64 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
