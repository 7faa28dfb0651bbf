use crate::model::GraphElements;
use crate::output::{GraphSummary, OutputFormatter};
use std::io::Write;

pub struct MarkdownOutput;

impl MarkdownOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, elements: &GraphElements, writer: &mut W) -> std::io::Result<()> {
        let summary = GraphSummary::compute(elements);

        writeln!(writer, "# Graph Overview\n")?;
        writeln!(
            writer,
            "{} nodes, {} edges ({} cross-module), {} module groups\n",
            elements.nodes.len(),
            elements.edges.len(),
            summary.inter_module_edges,
            elements.groups.len()
        )?;

        writeln!(writer, "## Modules\n")?;
        for (module, members) in &summary.module_counts {
            writeln!(writer, "- *{}*: {} nodes", module, members)?;
        }

        writeln!(writer, "\n## Archetypes\n")?;
        writeln!(writer, "- Controllers: {}", summary.controllers)?;
        writeln!(writer, "- Services: {}", summary.services)?;
        writeln!(writer, "- Models: {}", summary.models)?;

        if !summary.hubs.is_empty() {
            writeln!(writer, "\n## Hubs\n")?;
            for (label, degree) in &summary.hubs {
                writeln!(writer, "- `{}` (degree {})", label, degree)?;
            }
        }

        if !summary.orphans.is_empty() {
            writeln!(writer, "\n## Orphans\n")?;
            for label in &summary.orphans {
                writeln!(writer, "- `{}`", label)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawEdge, RawGraph, RawNode};
    use crate::normalize::normalize;

    #[test]
    fn test_markdown_summary_sections() {
        let elements = normalize(&RawGraph {
            nodes: vec![
                RawNode::new("payroll_a", "PayrollController"),
                RawNode::new("chat_b", "ChatService"),
                RawNode::new("lonely", "Lonely"),
            ],
            edges: vec![RawEdge::new("payroll_a", "chat_b")],
        });

        let mut buffer = Vec::new();
        MarkdownOutput::new().format(&elements, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("# Graph Overview"));
        assert!(output.contains("*HRMS*: 1 nodes"));
        assert!(output.contains("Controllers: 1"));
        assert!(output.contains("1 cross-module"));
        assert!(output.contains("`Lonely`"));
    }
}
