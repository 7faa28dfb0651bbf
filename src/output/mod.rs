mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::{Archetype, GraphElements};
use crate::taxonomy;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, elements: &GraphElements, writer: &mut W) -> std::io::Result<()>;
}

/// Shared rollup used by both formatters.
pub(crate) struct GraphSummary {
    pub module_counts: Vec<(String, usize)>,
    pub controllers: usize,
    pub services: usize,
    pub models: usize,
    pub hubs: Vec<(String, usize)>,
    pub orphans: Vec<String>,
    pub inter_module_edges: usize,
}

impl GraphSummary {
    pub fn compute(elements: &GraphElements) -> Self {
        let mut module_counts: Vec<(String, usize)> = elements
            .groups
            .iter()
            .map(|g| {
                let members = elements.nodes.iter().filter(|n| n.module == g.module).count();
                (g.module.clone(), members)
            })
            .collect();
        module_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let count_of = |archetype: Archetype| {
            elements
                .nodes
                .iter()
                .filter(|n| n.archetype == archetype)
                .count()
        };

        let mut hubs: Vec<(String, usize)> = elements
            .nodes
            .iter()
            .filter(|n| n.weight > taxonomy::HUB_DEGREE)
            .map(|n| (n.full_label.clone(), n.weight))
            .collect();
        hubs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let orphans: Vec<String> = elements
            .nodes
            .iter()
            .filter(|n| n.weight == 0)
            .map(|n| n.full_label.clone())
            .collect();

        Self {
            module_counts,
            controllers: count_of(Archetype::Controller),
            services: count_of(Archetype::Service),
            models: count_of(Archetype::Model),
            hubs,
            orphans,
            inter_module_edges: elements.edges.iter().filter(|e| e.is_inter_module).count(),
        }
    }
}
