//! Imperative operations against a live graph view: neighborhood
//! highlighting, directional flow tracing, filter application, and
//! per-module visibility scoping. Every operation runs as a single batch,
//! so the renderer never observes an intermediate state.

use crate::model::Topology;
use crate::view::{GraphView, Mark};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Transitive predecessors (everything feeding the node).
    Up,
    /// Transitive successors (everything the node feeds).
    Down,
}

/// Dim the whole view, then light up the node, its direct neighborhood,
/// the connecting edges, and the containing groups. Replaces any previous
/// highlight; calling twice with the same node yields the same end state.
pub fn highlight_node(view: &mut GraphView, node_id: &str) {
    let Some(parent) = view.elements().node(node_id).map(|n| n.parent.clone()) else {
        return;
    };

    let hood = view.neighborhood(node_id);
    let mut groups: HashSet<String> = HashSet::from([parent]);
    for id in &hood.nodes {
        if let Some(node) = view.elements().node(id) {
            groups.insert(node.parent.clone());
        }
    }

    let all = view.elements().element_ids();
    view.batch(|b| {
        b.clear(Mark::Highlighted);
        for id in &all {
            b.add(id, Mark::Dimmed);
        }

        b.remove(node_id, Mark::Dimmed);
        b.add(node_id, Mark::Highlighted);
        for id in hood.nodes.iter().chain(hood.edges.iter()) {
            b.remove(id, Mark::Dimmed);
            b.add(id, Mark::Highlighted);
        }
        for id in &groups {
            b.remove(id, Mark::Dimmed);
        }
    });
}

/// Remove every highlight and dim mark atomically.
pub fn clear_highlights(view: &mut GraphView) {
    view.batch(|b| {
        b.clear(Mark::Highlighted);
        b.clear(Mark::Dimmed);
    });
}

/// Dim everything, then light up the reachability closure in the given
/// direction plus the target itself plus their containing groups. The
/// closure is computed with a visited set, so cyclic graphs terminate.
pub fn trace_flow(view: &mut GraphView, node_id: &str, direction: FlowDirection) {
    if view.elements().node(node_id).is_none() {
        return;
    }

    let mut flow = match direction {
        FlowDirection::Up => view.ancestors(node_id),
        FlowDirection::Down => view.descendants(node_id),
    };
    flow.insert(node_id.to_string());

    let groups: HashSet<String> = flow
        .iter()
        .filter_map(|id| view.elements().node(id).map(|n| n.parent.clone()))
        .collect();

    let all = view.elements().element_ids();
    view.batch(|b| {
        b.clear(Mark::Highlighted);
        for id in &all {
            b.add(id, Mark::Dimmed);
        }
        for id in flow.iter().chain(groups.iter()) {
            b.remove(id, Mark::Dimmed);
            b.add(id, Mark::Highlighted);
        }
    });
}

/// Re-evaluate filtered-out marks against the active filter key set.
///
/// Groups hide when their module key is inactive. Leaf nodes hide unless
/// module, complexity, archetype, AND topology keys are all active; a
/// single missing facet hides the node. Topology depends on live degree,
/// so this must re-run on every filter or content change.
pub fn apply_filters(view: &mut GraphView, active: &HashSet<String>) {
    let mut filtered: Vec<(String, bool)> = Vec::new();

    for group in &view.elements().groups {
        filtered.push((group.id.clone(), !active.contains(&group.module)));
    }

    for node in &view.elements().nodes {
        let topology = Topology::from_degree(view.degree(&node.id));
        let keep = active.contains(&node.module)
            && active.contains(node.complexity.as_key())
            && active.contains(node.archetype.as_key())
            && active.contains(topology.as_key());
        filtered.push((node.id.clone(), !keep));
    }

    view.batch(|b| {
        for (id, out) in &filtered {
            if *out {
                b.add(id, Mark::FilteredOut);
            } else {
                b.remove(id, Mark::FilteredOut);
            }
        }
    });
}

/// Full per-module visibility resync for a tenant context switch: hide
/// every element, then reveal nodes and groups whose module is in scope.
/// Edges are always shown; only node visibility is module-gated.
pub fn apply_module_scope(view: &mut GraphView, allowed: &HashSet<String>) {
    let all = view.elements().element_ids();
    let mut revealed: Vec<String> = view
        .elements()
        .nodes
        .iter()
        .filter(|n| allowed.contains(&n.module))
        .map(|n| n.id.clone())
        .collect();
    revealed.extend(
        view.elements()
            .groups
            .iter()
            .filter(|g| allowed.contains(&g.module))
            .map(|g| g.id.clone()),
    );
    let edges: Vec<String> = view.elements().edges.iter().map(|e| e.id.clone()).collect();

    view.batch(|b| {
        for id in &all {
            b.add(id, Mark::Hidden);
        }
        for id in revealed.iter().chain(edges.iter()) {
            b.remove(id, Mark::Hidden);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawEdge, RawGraph, RawNode};
    use crate::normalize::normalize;
    use crate::taxonomy;

    fn payroll_chat_view() -> GraphView {
        // Two HRMS nodes, one Comm node; payroll_a -> payroll_b -> chat_c.
        let raw = RawGraph {
            nodes: vec![
                RawNode::new("payroll_a", "PayrollA"),
                RawNode::new("payroll_b", "PayrollB"),
                RawNode::new("chat_c", "ChatC"),
            ],
            edges: vec![
                RawEdge::new("payroll_a", "payroll_b"),
                RawEdge::new("payroll_b", "chat_c"),
            ],
        };
        GraphView::new(normalize(&raw))
    }

    fn all_filter_keys() -> HashSet<String> {
        let mut keys: HashSet<String> =
            taxonomy::module_names().map(String::from).collect();
        keys.extend(taxonomy::COMPLEXITY_KEYS.iter().map(|k| k.to_string()));
        keys.extend(taxonomy::ARCHETYPE_KEYS.iter().map(|k| k.to_string()));
        keys.extend(taxonomy::TOPOLOGY_KEYS.iter().map(|k| k.to_string()));
        keys
    }

    #[test]
    fn test_highlight_dims_rest_and_lights_neighborhood() {
        let mut view = payroll_chat_view();
        highlight_node(&mut view, "payroll_b");

        assert!(view.has_mark("payroll_b", Mark::Highlighted));
        assert!(view.has_mark("payroll_a", Mark::Highlighted));
        assert!(view.has_mark("chat_c", Mark::Highlighted));
        assert!(!view.has_mark("payroll_b", Mark::Dimmed));
        // Groups of the target and neighbors are un-dimmed, not highlighted.
        assert!(!view.has_mark("g_HRMS", Mark::Dimmed));
        assert!(!view.has_mark("g_Comm", Mark::Dimmed));
        assert!(!view.has_mark("g_HRMS", Mark::Highlighted));
    }

    #[test]
    fn test_highlight_is_idempotent_and_replacing() {
        let mut view = payroll_chat_view();

        highlight_node(&mut view, "payroll_a");
        let first: Vec<String> = view
            .marked(Mark::Highlighted)
            .into_iter()
            .map(String::from)
            .collect();

        highlight_node(&mut view, "payroll_a");
        let mut second: Vec<String> = view
            .marked(Mark::Highlighted)
            .into_iter()
            .map(String::from)
            .collect();
        let mut first_sorted = first.clone();
        first_sorted.sort();
        second.sort();
        assert_eq!(first_sorted, second);

        // A new target replaces the old highlight entirely; payroll_a is
        // not adjacent to chat_c, so it must lose its mark.
        highlight_node(&mut view, "chat_c");
        assert!(!view.has_mark("payroll_a", Mark::Highlighted));
        assert!(view.has_mark("payroll_a", Mark::Dimmed));
    }

    #[test]
    fn test_clear_highlights_returns_view_to_neutral() {
        let mut view = payroll_chat_view();
        highlight_node(&mut view, "payroll_b");
        clear_highlights(&mut view);

        assert!(view.marked(Mark::Highlighted).is_empty());
        assert!(view.marked(Mark::Dimmed).is_empty());
    }

    #[test]
    fn test_trace_flow_up_handles_cycles() {
        let raw = RawGraph {
            nodes: vec![
                RawNode::new("a", "A"),
                RawNode::new("b", "B"),
                RawNode::new("c", "C"),
                RawNode::new("d", "D"),
            ],
            edges: vec![
                RawEdge::new("a", "b"),
                RawEdge::new("b", "c"),
                RawEdge::new("c", "a"),
                RawEdge::new("d", "b"),
            ],
        };
        let mut view = GraphView::new(normalize(&raw));

        trace_flow(&mut view, "c", FlowDirection::Up);

        for id in ["a", "b", "c", "d"] {
            assert!(view.has_mark(id, Mark::Highlighted), "{} not in flow", id);
        }
        assert!(!view.has_mark("c", Mark::Dimmed));
    }

    #[test]
    fn test_trace_flow_down_excludes_unreachable() {
        let mut view = payroll_chat_view();
        trace_flow(&mut view, "payroll_b", FlowDirection::Down);

        assert!(view.has_mark("payroll_b", Mark::Highlighted));
        assert!(view.has_mark("chat_c", Mark::Highlighted));
        assert!(view.has_mark("payroll_a", Mark::Dimmed));
        assert!(!view.has_mark("payroll_a", Mark::Highlighted));
    }

    #[test]
    fn test_filters_require_all_four_facets() {
        // hub_x has degree 6: module Utils, complexity high, topology hub.
        let mut raw = RawGraph::default();
        raw.nodes.push(RawNode::new("hub_x", "HubX"));
        for i in 0..6 {
            raw.nodes.push(RawNode::new(format!("n{}", i), format!("N{}", i)));
            raw.edges.push(RawEdge::new("hub_x", format!("n{}", i)));
        }
        let mut view = GraphView::new(normalize(&raw));

        let mut active = all_filter_keys();
        active.remove("hub");
        apply_filters(&mut view, &active);
        assert!(view.has_mark("hub_x", Mark::FilteredOut));
        assert!(!view.has_mark("n0", Mark::FilteredOut));

        // Restoring the topology key un-marks on reapplication.
        active.insert("hub".to_string());
        apply_filters(&mut view, &active);
        assert!(!view.has_mark("hub_x", Mark::FilteredOut));
    }

    #[test]
    fn test_group_filtering_follows_module_key() {
        let mut view = payroll_chat_view();
        let mut active = all_filter_keys();
        active.remove("Comm");

        apply_filters(&mut view, &active);
        assert!(view.has_mark("g_Comm", Mark::FilteredOut));
        assert!(!view.has_mark("g_HRMS", Mark::FilteredOut));
        assert!(view.has_mark("chat_c", Mark::FilteredOut));
    }

    #[test]
    fn test_module_scope_hides_nodes_not_edges() {
        let mut view = payroll_chat_view();
        let allowed: HashSet<String> = HashSet::from(["HRMS".to_string()]);

        apply_module_scope(&mut view, &allowed);

        assert!(!view.has_mark("payroll_a", Mark::Hidden));
        assert!(!view.has_mark("g_HRMS", Mark::Hidden));
        assert!(view.has_mark("chat_c", Mark::Hidden));
        assert!(view.has_mark("g_Comm", Mark::Hidden));
        // Edges always shown regardless of module.
        assert!(!view.has_mark("e0", Mark::Hidden));
        assert!(!view.has_mark("e1", Mark::Hidden));
    }
}
