//! Session-scoped graph state container: the active graph payload, view
//! handle, visual preferences, tenant scoping, and edit-mode state.
//!
//! One container instance per active session, passed explicitly to
//! whatever drives the view: process-wide lifetime without a language-
//! level singleton. Only the `SessionPrefs` subset survives across
//! sessions; everything else is rebuilt on load.

mod prefs;

pub use prefs::{Position, SessionPrefs};

use crate::interact;
use crate::model::{GraphElements, RawEdge, RawGraph, RawNode};
use crate::normalize::normalize;
use crate::stylesheet::{self, Stylesheet, Theme};
use crate::taxonomy;
use crate::view::GraphView;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct GraphStore {
    raw: Option<RawGraph>,
    elements: GraphElements,
    view: Option<GraphView>,
    node_count: usize,
    edge_count: usize,
    theme: Theme,
    positions: HashMap<String, Position>,
    filter_panel_open: bool,
    active_filters: HashSet<String>,
    selected_tenant: Option<String>,
    allowed_modules: HashSet<String>,
    module_colors: HashMap<String, String>,
    popup: Option<String>,
    pending_connection: Option<String>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        let allowed: HashSet<String> = taxonomy::module_names().map(String::from).collect();
        let active_filters = default_filters(&allowed);

        Self {
            raw: None,
            elements: GraphElements::default(),
            view: None,
            node_count: 0,
            edge_count: 0,
            theme: Theme::default(),
            positions: HashMap::new(),
            filter_panel_open: false,
            active_filters,
            selected_tenant: None,
            allowed_modules: allowed,
            module_colors: HashMap::new(),
            popup: None,
            pending_connection: None,
        }
    }

    /// Restore the persisted preference subset. The tenant's allowed-module
    /// set is not part of the prefs; callers follow up with
    /// `set_company_context` once the directory has been consulted.
    pub fn apply_prefs(&mut self, prefs: SessionPrefs) {
        self.theme = prefs.theme;
        self.positions = prefs.positions;
        self.selected_tenant = prefs.selected_tenant;
    }

    /// The preference subset that survives this session.
    pub fn prefs(&self) -> SessionPrefs {
        SessionPrefs {
            theme: self.theme,
            positions: self.positions.clone(),
            selected_tenant: self.selected_tenant.clone(),
        }
    }

    // --- graph payload ---

    /// Replace the whole graph payload and rebuild the attached view.
    pub fn set_graph_data(&mut self, raw: RawGraph) {
        self.raw = Some(raw);
        self.refresh_from_raw();
    }

    pub fn raw(&self) -> Option<&RawGraph> {
        self.raw.as_ref()
    }

    pub fn elements(&self) -> &GraphElements {
        &self.elements
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    // --- view handle ---

    /// Attach a fresh view over the current payload. Any previous view is
    /// torn down first; the handle is owned by exactly one store.
    pub fn attach_view(&mut self) {
        self.view = Some(GraphView::new(self.elements.clone()));
        self.resync_view();
    }

    pub fn detach_view(&mut self) {
        self.view = None;
    }

    pub fn view(&self) -> Option<&GraphView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut GraphView> {
        self.view.as_mut()
    }

    // --- optimistic local edits ---

    /// Add a node to local state immediately; persistence happens after,
    /// at the service boundary.
    pub fn add_node(&mut self, node: RawNode) {
        self.raw.get_or_insert_with(RawGraph::default).nodes.push(node);
        self.refresh_from_raw();
    }

    pub fn add_edge(&mut self, edge: RawEdge) {
        self.raw.get_or_insert_with(RawGraph::default).edges.push(edge);
        self.refresh_from_raw();
    }

    /// Remove a node (with its incident edges) or an edge by element id.
    /// Returns false when nothing matched.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let Some(raw) = &mut self.raw else {
            return false;
        };

        let removed = if let Some(pos) = raw.nodes.iter().position(|n| n.id == id) {
            raw.nodes.remove(pos);
            raw.edges.retain(|e| e.source != id && e.target != id);
            self.positions.remove(id);
            if self.popup.as_deref() == Some(id) {
                self.popup = None;
            }
            true
        } else if let Some(idx) = id.strip_prefix('e').and_then(|s| s.parse::<usize>().ok()) {
            if idx < raw.edges.len() {
                raw.edges.remove(idx);
                true
            } else {
                false
            }
        } else {
            false
        };

        if removed {
            self.refresh_from_raw();
        }
        removed
    }

    fn refresh_from_raw(&mut self) {
        self.elements = match &self.raw {
            Some(raw) => normalize(raw),
            None => GraphElements::default(),
        };
        self.node_count = self.elements.nodes.len();
        self.edge_count = self.elements.edges.len();

        if self.view.is_some() {
            // Content changed; the old view's adjacency is stale. Rebuild
            // and re-run scoping and filters (topology depends on degree).
            self.view = Some(GraphView::new(self.elements.clone()));
            self.resync_view();
        }
    }

    fn resync_view(&mut self) {
        if let Some(view) = &mut self.view {
            interact::apply_module_scope(view, &self.allowed_modules);
            interact::apply_filters(view, &self.active_filters);
        }
    }

    // --- presentation ---

    /// Flip the global presentation mode. Callers re-pull `stylesheet()`.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Resolved style rules for the current theme and module colors.
    pub fn stylesheet(&self) -> Stylesheet {
        stylesheet::resolve(self.theme, &self.module_colors)
    }

    /// Replace tenant-configured module colors (from the directory).
    pub fn set_module_colors(&mut self, colors: HashMap<String, String>) {
        self.module_colors = colors;
    }

    /// Merge a manual position override for one node.
    pub fn patch_position(&mut self, node_id: &str, position: Position) {
        self.positions.insert(node_id.to_string(), position);
    }

    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    // --- filters ---

    pub fn toggle_filter_panel(&mut self) -> bool {
        self.filter_panel_open = !self.filter_panel_open;
        self.filter_panel_open
    }

    pub fn active_filters(&self) -> &HashSet<String> {
        &self.active_filters
    }

    /// Symmetric-difference toggle: toggling the same key twice is a no-op.
    pub fn toggle_filter(&mut self, key: &str) {
        if !self.active_filters.remove(key) {
            self.active_filters.insert(key.to_string());
        }
        if let Some(view) = &mut self.view {
            interact::apply_filters(view, &self.active_filters);
        }
    }

    /// Tenant-aware reset: currently-allowed modules plus every
    /// complexity, archetype, and topology key, not the global taxonomy.
    pub fn reset_filters(&mut self) {
        self.active_filters = default_filters(&self.allowed_modules);
        if let Some(view) = &mut self.view {
            interact::apply_filters(view, &self.active_filters);
        }
    }

    // --- tenant scoping ---

    pub fn selected_tenant(&self) -> Option<&str> {
        self.selected_tenant.as_deref()
    }

    pub fn allowed_modules(&self) -> &HashSet<String> {
        &self.allowed_modules
    }

    /// Switch tenant context. A `None` tenant is the administrative view:
    /// the effective allowed set is the full taxonomy, whatever was passed
    /// alongside. Recomputes allowed modules and active filters together,
    /// then fully resyncs per-module visibility on the live view.
    pub fn set_company_context(
        &mut self,
        tenant_id: Option<String>,
        allowed_modules: Vec<String>,
    ) {
        debug!(?tenant_id, "switching company context");
        self.selected_tenant = tenant_id;
        self.allowed_modules = match self.selected_tenant {
            None => taxonomy::module_names().map(String::from).collect(),
            Some(_) => allowed_modules.into_iter().collect(),
        };
        self.active_filters = default_filters(&self.allowed_modules);
        self.resync_view();
    }

    // --- popup and connection mode ---

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    /// Open the node-detail popup and highlight its neighborhood.
    pub fn open_popup(&mut self, node_id: &str) {
        if self.elements.node(node_id).is_none() {
            return;
        }
        self.popup = Some(node_id.to_string());
        if let Some(view) = &mut self.view {
            interact::highlight_node(view, node_id);
        }
    }

    /// Closing the popup also clears engine-level highlights.
    pub fn close_popup(&mut self) {
        self.popup = None;
        if let Some(view) = &mut self.view {
            interact::clear_highlights(view);
        }
    }

    pub fn enter_connection_mode(&mut self, source_id: &str) {
        self.pending_connection = Some(source_id.to_string());
    }

    /// Leave connection mode, returning the pending edge source if any.
    pub fn exit_connection_mode(&mut self) -> Option<String> {
        self.pending_connection.take()
    }

    pub fn pending_connection(&self) -> Option<&str> {
        self.pending_connection.as_deref()
    }
}

fn default_filters(allowed: &HashSet<String>) -> HashSet<String> {
    let mut keys: HashSet<String> = allowed.iter().cloned().collect();
    keys.extend(taxonomy::COMPLEXITY_KEYS.iter().map(|k| k.to_string()));
    keys.extend(taxonomy::ARCHETYPE_KEYS.iter().map(|k| k.to_string()));
    keys.extend(taxonomy::TOPOLOGY_KEYS.iter().map(|k| k.to_string()));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Mark;

    fn seeded_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.set_graph_data(RawGraph {
            nodes: vec![
                RawNode::new("payroll_a", "PayrollA"),
                RawNode::new("chat_b", "ChatB"),
            ],
            edges: vec![RawEdge::new("payroll_a", "chat_b")],
        });
        store.attach_view();
        store
    }

    #[test]
    fn test_counts_track_payload() {
        let store = seeded_store();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_toggle_filter_twice_is_a_noop() {
        let mut store = seeded_store();
        let before = store.active_filters().clone();

        store.toggle_filter("HRMS");
        assert!(!store.active_filters().contains("HRMS"));
        store.toggle_filter("HRMS");
        assert_eq!(*store.active_filters(), before);
    }

    #[test]
    fn test_company_context_null_restores_full_taxonomy() {
        let mut store = seeded_store();
        store.set_company_context(Some("t1".to_string()), vec!["HRMS".to_string()]);
        assert_eq!(store.allowed_modules().len(), 1);

        // The empty list passed alongside a null tenant is ignored.
        store.set_company_context(None, vec![]);
        let expected: HashSet<String> = taxonomy::module_names().map(String::from).collect();
        assert_eq!(*store.allowed_modules(), expected);
    }

    #[test]
    fn test_filter_reset_is_tenant_aware() {
        let mut store = seeded_store();
        store.set_company_context(Some("t1".to_string()), vec!["HRMS".to_string()]);
        store.reset_filters();

        assert!(store.active_filters().contains("HRMS"));
        assert!(!store.active_filters().contains("CRM"));
        assert!(store.active_filters().contains("hub"));
        assert!(store.active_filters().contains("Controller"));
    }

    #[test]
    fn test_tenant_scope_hides_out_of_scope_nodes() {
        let mut store = seeded_store();
        store.set_company_context(Some("t1".to_string()), vec!["HRMS".to_string()]);

        let view = store.view().unwrap();
        assert!(!view.has_mark("payroll_a", Mark::Hidden));
        assert!(view.has_mark("chat_b", Mark::Hidden));
        // Edges stay visible regardless of module.
        assert!(!view.has_mark("e0", Mark::Hidden));
    }

    #[test]
    fn test_close_popup_clears_highlights() {
        let mut store = seeded_store();
        store.open_popup("payroll_a");
        assert_eq!(store.popup(), Some("payroll_a"));
        assert!(store.view().unwrap().has_mark("payroll_a", Mark::Highlighted));

        store.close_popup();
        assert!(store.popup().is_none());
        assert!(store.view().unwrap().marked(Mark::Highlighted).is_empty());
        assert!(store.view().unwrap().marked(Mark::Dimmed).is_empty());
    }

    #[test]
    fn test_optimistic_add_is_immediately_visible() {
        let mut store = seeded_store();
        store.add_node(RawNode::new("invoice_c", "InvoiceC"));

        assert_eq!(store.node_count(), 3);
        assert!(store.elements().node("invoice_c").is_some());
        // The rebuilt view picked up the new node and its group.
        assert!(store.view().unwrap().elements().group("g_CRM").is_some());
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut store = seeded_store();
        assert!(store.remove_element("payroll_a"));
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);

        assert!(!store.remove_element("payroll_a"));
        assert!(!store.remove_element("e9"));
    }

    #[test]
    fn test_remove_edge_by_element_id() {
        let mut store = seeded_store();
        assert!(store.remove_element("e0"));
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_theme_toggle_flows_into_stylesheet() {
        let mut store = seeded_store();
        let initial = store.stylesheet().theme;
        let flipped = store.toggle_theme();
        assert_ne!(initial, flipped);
        assert_eq!(store.stylesheet().theme, flipped);
    }

    #[test]
    fn test_position_patch_merges() {
        let mut store = seeded_store();
        store.patch_position("payroll_a", Position { x: 1.0, y: 2.0 });
        store.patch_position("chat_b", Position { x: 3.0, y: 4.0 });
        store.patch_position("payroll_a", Position { x: 9.0, y: 2.0 });

        assert_eq!(store.positions().len(), 2);
        assert_eq!(store.positions()["payroll_a"].x, 9.0);
    }

    #[test]
    fn test_connection_mode_tracks_pending_source() {
        let mut store = seeded_store();
        store.enter_connection_mode("payroll_a");
        assert_eq!(store.pending_connection(), Some("payroll_a"));
        assert_eq!(store.exit_connection_mode().as_deref(), Some("payroll_a"));
        assert!(store.pending_connection().is_none());
    }

    #[test]
    fn test_prefs_roundtrip_subset() {
        let mut store = seeded_store();
        store.toggle_theme();
        store.patch_position("payroll_a", Position { x: 5.0, y: 5.0 });
        store.set_company_context(Some("t1".to_string()), vec!["HRMS".to_string()]);

        let prefs = store.prefs();
        let mut fresh = GraphStore::new();
        fresh.apply_prefs(prefs.clone());

        assert_eq!(fresh.theme(), store.theme());
        assert_eq!(fresh.selected_tenant(), Some("t1"));
        assert_eq!(fresh.positions().len(), 1);
        // Filter and view state never survive the session.
        assert_eq!(prefs.positions.len(), 1);
    }
}
