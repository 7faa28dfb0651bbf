use crate::taxonomy;
use serde::{Deserialize, Serialize};

/// Structural role derived from a node's naming convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Archetype {
    Controller,
    Service,
    Model,
}

impl Archetype {
    /// The filter key this archetype answers to.
    pub fn as_key(&self) -> &'static str {
        match self {
            Archetype::Controller => "Controller",
            Archetype::Service => "Service",
            Archetype::Model => "Model",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    High,
    Normal,
}

impl Complexity {
    pub fn as_key(&self) -> &'static str {
        match self {
            Complexity::High => "high",
            Complexity::Normal => "normal",
        }
    }
}

/// Degree-derived classification, used only for filtering. Never stored:
/// recomputed live because it depends on the current edge set.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Orphan,
    Hub,
    Normal,
}

impl Topology {
    pub fn from_degree(degree: usize) -> Self {
        if degree == 0 {
            Topology::Orphan
        } else if degree > taxonomy::HUB_DEGREE {
            Topology::Hub
        } else {
            Topology::Normal
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Topology::Orphan => "orphan",
            Topology::Hub => "hub",
            Topology::Normal => "normal",
        }
    }
}

/// A normalized leaf node ready for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Node {
    pub id: String,
    /// Cleaned display label. Lossy; use `full_label` for search,
    /// tooltips, and identity.
    pub label: String,
    pub full_label: String,
    pub module: String,
    /// Id of the containing group node, always `"g_" + module`.
    pub parent: String,
    /// Degree at normalization time (self-loops count twice).
    pub weight: usize,
    pub complexity: Complexity,
    pub archetype: Archetype,
}

/// Synthetic container representing all nodes of one module. Regenerated on
/// every normalization pass, never persisted independently.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupNode {
    pub id: String,
    pub label: String,
    pub is_group: bool,
    pub module: String,
}

impl GroupNode {
    pub fn for_module(module: &str) -> Self {
        Self {
            id: taxonomy::group_id(module),
            label: module.to_string(),
            is_group: true,
            module: module.to_string(),
        }
    }
}

/// A normalized edge. `kind` only affects rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: String,
    pub is_inter_module: bool,
}

/// The full normalized element set produced by one normalization pass.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct GraphElements {
    pub nodes: Vec<Node>,
    pub groups: Vec<GroupNode>,
    pub edges: Vec<Edge>,
}

impl GraphElements {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Ids of every element: groups, nodes, then edges.
    pub fn element_ids(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| g.id.clone())
            .chain(self.nodes.iter().map(|n| n.id.clone()))
            .chain(self.edges.iter().map(|e| e.id.clone()))
            .collect()
    }
}
