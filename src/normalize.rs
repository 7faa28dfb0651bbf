//! Transforms a raw node/edge document into the normalized element set:
//! classified nodes, synthetic per-module group containers, and edges
//! tagged with cross-module information.

use crate::classify;
use crate::model::{Edge, GraphElements, GroupNode, Node, RawGraph};
use crate::taxonomy;
use std::collections::{BTreeSet, HashMap};

/// Normalize a raw graph. Group nodes are regenerated from the modules
/// actually referenced by the emitted nodes; taxonomy categories with no
/// members produce no group.
pub fn normalize(raw: &RawGraph) -> GraphElements {
    // Resolve every node's module up front; edge tagging needs both
    // endpoints' modules.
    let modules: HashMap<&str, String> = raw
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), classify::resolve_module(n)))
        .collect();

    // Per-node degree. Source and target are counted independently, so a
    // self-loop contributes two.
    let mut degrees: HashMap<&str, usize> = HashMap::new();
    for edge in &raw.edges {
        *degrees.entry(edge.source.as_str()).or_insert(0) += 1;
        *degrees.entry(edge.target.as_str()).or_insert(0) += 1;
    }

    let nodes: Vec<Node> = raw
        .nodes
        .iter()
        .map(|n| {
            let module = modules[n.id.as_str()].clone();
            let degree = degrees.get(n.id.as_str()).copied().unwrap_or(0);

            Node {
                id: n.id.clone(),
                label: clean_label(&n.label),
                full_label: n.label.clone(),
                parent: taxonomy::group_id(&module),
                module,
                weight: degree,
                complexity: classify::complexity_of(n.complexity, degree),
                archetype: classify::archetype_of(&n.label),
            }
        })
        .collect();

    let edges: Vec<Edge> = raw
        .edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let is_inter_module = match (modules.get(e.source.as_str()), modules.get(e.target.as_str()))
            {
                (Some(a), Some(b)) => a != b,
                _ => false,
            };

            Edge {
                id: format!("e{}", i),
                source: e.source.clone(),
                target: e.target.clone(),
                kind: e.kind.clone(),
                is_inter_module,
            }
        })
        .collect();

    // One group per distinct module present among the emitted nodes.
    let present: BTreeSet<&str> = nodes.iter().map(|n| n.module.as_str()).collect();
    let groups: Vec<GroupNode> = present.iter().map(|m| GroupNode::for_module(m)).collect();

    GraphElements {
        nodes,
        groups,
        edges,
    }
}

/// Clean a label for display: underscores to spaces, a space before each
/// capital, trailing Controller/Service stripped case-insensitively, then
/// truncation. Lossy and one-directional; the full label is preserved on
/// the node.
pub fn clean_label(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        if ch == '_' {
            spaced.push(' ');
            continue;
        }
        if ch.is_uppercase() && !spaced.is_empty() && !spaced.ends_with(' ') {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    let mut cleaned = spaced.trim().to_string();
    let lower = cleaned.to_lowercase();
    for suffix in ["controller", "service"] {
        if lower.ends_with(suffix) {
            cleaned.truncate(cleaned.len() - suffix.len());
            cleaned = cleaned.trim_end().to_string();
            break;
        }
    }

    if cleaned.chars().count() > taxonomy::LABEL_MAX {
        let kept: String = cleaned.chars().take(taxonomy::LABEL_KEEP).collect();
        format!("{}..", kept)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Archetype, Complexity, RawEdge, RawNode};

    fn graph(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> RawGraph {
        RawGraph {
            nodes: nodes.iter().map(|(id, l)| RawNode::new(*id, *l)).collect(),
            edges: edges.iter().map(|(s, t)| RawEdge::new(*s, *t)).collect(),
        }
    }

    #[test]
    fn test_clean_label_strips_suffix_and_spaces_capitals() {
        assert_eq!(clean_label("UserController"), "User");
        assert_eq!(clean_label("payroll_sync_service"), "payroll sync");
        assert_eq!(clean_label("InvoiceLineItem"), "Invoice Line Item");
    }

    #[test]
    fn test_clean_label_truncates_past_twenty_chars() {
        // 24 chars after cleaning; keep 18 and append "..".
        let label = "abcdefghijklmnopqrstuvwx";
        let cleaned = clean_label(label);
        assert_eq!(cleaned, "abcdefghijklmnopqr..");
        assert_eq!(cleaned.chars().count(), 20);

        // Exactly at the limit: untouched.
        let at_limit = "abcdefghijklmnopqrst";
        assert_eq!(clean_label(at_limit), at_limit);
    }

    #[test]
    fn test_every_parent_has_a_matching_group() {
        let g = graph(
            &[("payroll_a", "PayrollA"), ("chat_b", "ChatB"), ("misc", "Misc")],
            &[("payroll_a", "chat_b")],
        );
        let elements = normalize(&g);

        for node in &elements.nodes {
            assert_eq!(node.parent, format!("g_{}", node.module));
            assert!(
                elements.group(&node.parent).is_some(),
                "missing group for {}",
                node.parent
            );
        }
        // No group without members.
        for group in &elements.groups {
            assert!(elements.nodes.iter().any(|n| n.module == group.module));
        }
        // Unused taxonomy categories produce no group.
        assert!(elements.group("g_CRM").is_none());
    }

    #[test]
    fn test_inter_module_edge_tagging() {
        let g = graph(
            &[("payroll_a", "PayrollA"), ("payroll_b", "PayrollB"), ("chat_c", "ChatC")],
            &[("payroll_a", "payroll_b"), ("payroll_a", "chat_c")],
        );
        let elements = normalize(&g);

        assert!(!elements.edges[0].is_inter_module);
        assert!(elements.edges[1].is_inter_module);
    }

    #[test]
    fn test_self_loop_counts_twice_toward_degree() {
        let g = graph(&[("misc", "Misc")], &[("misc", "misc")]);
        let elements = normalize(&g);
        assert_eq!(elements.nodes[0].weight, 2);
    }

    #[test]
    fn test_degree_drives_default_complexity() {
        let spokes: Vec<(String, String)> = (0..6).map(|i| (format!("s{}", i), format!("S{}", i))).collect();
        let mut nodes: Vec<(&str, &str)> = vec![("hub_x", "HubX")];
        nodes.extend(spokes.iter().map(|(id, l)| (id.as_str(), l.as_str())));
        let edges: Vec<(&str, &str)> = spokes.iter().map(|(id, _)| ("hub_x", id.as_str())).collect();

        let elements = normalize(&graph(&nodes, &edges));
        let hub = elements.node("hub_x").unwrap();
        assert_eq!(hub.weight, 6);
        assert_eq!(hub.complexity, Complexity::High);

        let spoke = elements.node("s0").unwrap();
        assert_eq!(spoke.complexity, Complexity::Normal);
    }

    #[test]
    fn test_full_label_preserved_verbatim() {
        let g = graph(&[("u", "User_Profile_Controller")], &[]);
        let elements = normalize(&g);
        assert_eq!(elements.nodes[0].full_label, "User_Profile_Controller");
        assert_eq!(elements.nodes[0].label, "User Profile");
    }

    #[test]
    fn test_normalize_is_stable_over_derived_fields() {
        let g = graph(
            &[("payroll_a", "PayrollA"), ("chat_b", "ChatB")],
            &[("payroll_a", "chat_b")],
        );
        let first = normalize(&g);
        let second = normalize(&g);
        assert_eq!(first, second);
    }

    #[test]
    fn test_end_to_end_user_controller() {
        let g = graph(&[("UserController", "UserController")], &[]);
        let elements = normalize(&g);

        let node = elements.node("UserController").unwrap();
        assert_eq!(node.module, "Core");
        assert_eq!(node.archetype, Archetype::Controller);
        assert_eq!(node.label, "User");
        assert_eq!(node.full_label, "UserController");
        assert_eq!(node.complexity, Complexity::Normal);
        assert_eq!(elements.groups.len(), 1);
        assert_eq!(elements.groups[0].id, "g_Core");
    }
}
