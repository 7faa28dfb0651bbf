mod directory;
mod element;
mod raw;
mod snapshot;

pub use directory::{ModuleDef, Policy, Principal, Role, Tenant, User};
pub use element::{Archetype, Complexity, Edge, GraphElements, GroupNode, Node, Topology};
pub use raw::{
    parse_upload, RawEdge, RawGraph, RawNode, UploadDoc, UploadError, DEFAULT_EDGE_KIND,
};
pub use snapshot::{epoch_now, GraphSnapshot, SnapshotMeta};
