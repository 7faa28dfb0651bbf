//! Raw graph documents as uploaded, before normalization. This is also the
//! shape persisted inside snapshots.

use super::element::Complexity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Covers both missing top-level sections and elements missing required
    /// fields; the whole upload is rejected either way.
    #[error("Invalid upload document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// True for nodes created through live editing rather than bulk upload.
    #[serde(default, rename = "isManual", skip_serializing_if = "std::ops::Not::not")]
    pub is_manual: bool,
}

impl RawNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            complexity: None,
            module: None,
            is_manual: false,
        }
    }
}

pub const DEFAULT_EDGE_KIND: &str = "default";

fn default_edge_kind() -> String {
    DEFAULT_EDGE_KIND.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(default = "default_edge_kind", rename = "type")]
    pub kind: String,
}

impl RawEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: default_edge_kind(),
        }
    }
}

/// Raw node/edge content, pre-normalization.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

/// Bulk upload wire format: `{nodes: [{data: ...}], edges: [{data: ...}]}`.
/// Both top-level keys are required.
#[derive(Debug, Deserialize)]
pub struct UploadDoc {
    nodes: Vec<Wrapped<RawNode>>,
    edges: Vec<Wrapped<RawEdge>>,
}

#[derive(Debug, Deserialize)]
struct Wrapped<T> {
    data: T,
}

impl UploadDoc {
    pub fn into_graph(self) -> RawGraph {
        RawGraph {
            nodes: self.nodes.into_iter().map(|w| w.data).collect(),
            edges: self.edges.into_iter().map(|w| w.data).collect(),
        }
    }
}

/// Parse an upload document, rejecting the entire payload when a required
/// key or field is missing.
pub fn parse_upload(json: &str) -> Result<RawGraph, UploadError> {
    let doc: UploadDoc = serde_json::from_str(json)?;
    Ok(doc.into_graph())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_upload() {
        let json = r#"{
            "nodes": [{"data": {"id": "a", "label": "A"}}],
            "edges": [{"data": {"source": "a", "target": "a"}}]
        }"#;

        let graph = parse_upload(json).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].kind, DEFAULT_EDGE_KIND);
        assert!(!graph.nodes[0].is_manual);
    }

    #[test]
    fn test_missing_edges_key_rejected() {
        let json = r#"{"nodes": []}"#;
        assert!(parse_upload(json).is_err());
    }

    #[test]
    fn test_node_missing_label_rejects_whole_upload() {
        let json = r#"{
            "nodes": [{"data": {"id": "a", "label": "A"}}, {"data": {"id": "b"}}],
            "edges": []
        }"#;
        assert!(parse_upload(json).is_err());
    }

    #[test]
    fn test_edge_type_and_manual_flag_roundtrip() {
        let json = r#"{
            "nodes": [{"data": {"id": "a", "label": "A", "isManual": true, "module": "CRM"}}],
            "edges": [{"data": {"source": "a", "target": "a", "type": "inheritance"}}]
        }"#;

        let graph = parse_upload(json).unwrap();
        assert!(graph.nodes[0].is_manual);
        assert_eq!(graph.nodes[0].module.as_deref(), Some("CRM"));
        assert_eq!(graph.edges[0].kind, "inheritance");
    }
}
