use crate::model::GraphElements;
use crate::output::{GraphSummary, OutputFormatter};
use serde::Serialize;
use std::io::Write;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    node_count: usize,
    edge_count: usize,
    inter_module_edges: usize,
    modules: Vec<JsonModule<'a>>,
    archetypes: JsonArchetypes,
    hubs: Vec<JsonHub<'a>>,
    orphans: Vec<&'a str>,
}

#[derive(Serialize)]
struct JsonModule<'a> {
    name: &'a str,
    nodes: usize,
}

#[derive(Serialize)]
struct JsonArchetypes {
    controllers: usize,
    services: usize,
    models: usize,
}

#[derive(Serialize)]
struct JsonHub<'a> {
    label: &'a str,
    degree: usize,
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, elements: &GraphElements, writer: &mut W) -> std::io::Result<()> {
        let summary = GraphSummary::compute(elements);

        let json_summary = JsonSummary {
            node_count: elements.nodes.len(),
            edge_count: elements.edges.len(),
            inter_module_edges: summary.inter_module_edges,
            modules: summary
                .module_counts
                .iter()
                .map(|(name, nodes)| JsonModule {
                    name,
                    nodes: *nodes,
                })
                .collect(),
            archetypes: JsonArchetypes {
                controllers: summary.controllers,
                services: summary.services,
                models: summary.models,
            },
            hubs: summary
                .hubs
                .iter()
                .map(|(label, degree)| JsonHub {
                    label,
                    degree: *degree,
                })
                .collect(),
            orphans: summary.orphans.iter().map(String::as_str).collect(),
        };

        let json = serde_json::to_string_pretty(&json_summary)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawGraph, RawNode};
    use crate::normalize::normalize;

    #[test]
    fn test_json_output_parses_back() {
        let elements = normalize(&RawGraph {
            nodes: vec![RawNode::new("UserController", "UserController")],
            edges: vec![],
        });

        let mut buffer = Vec::new();
        JsonOutput::new().format(&elements, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["node_count"], 1);
        assert_eq!(value["modules"][0]["name"], "Core");
        assert_eq!(value["archetypes"]["controllers"], 1);
    }
}
