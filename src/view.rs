//! Live graph view: element lookup, adjacency traversal, and batched class
//! mutation. Mutations queued in a batch apply together and bump the render
//! generation exactly once, so no intermediate state is observable.

use crate::model::GraphElements;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Visual state classes attached to elements by the interaction engine and
/// the store's module-visibility resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Dimmed,
    Highlighted,
    Selected,
    FilteredOut,
    Hidden,
}

/// Direct neighborhood of a node: adjacent node ids and incident edge ids.
#[derive(Debug, Default, Clone)]
pub struct Neighborhood {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

pub struct GraphView {
    elements: GraphElements,
    graph: DiGraph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
    marks: HashMap<String, HashSet<Mark>>,
    generation: u64,
}

impl GraphView {
    pub fn new(elements: GraphElements) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in &elements.nodes {
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        // Edges referencing unknown endpoints get no adjacency entry; they
        // still exist as elements and can carry marks.
        for edge in &elements.edges {
            if let (Some(&from), Some(&to)) = (
                node_indices.get(&edge.source),
                node_indices.get(&edge.target),
            ) {
                graph.add_edge(from, to, edge.id.clone());
            }
        }

        Self {
            elements,
            graph,
            node_indices,
            marks: HashMap::new(),
            generation: 0,
        }
    }

    pub fn elements(&self) -> &GraphElements {
        &self.elements
    }

    /// Monotonic counter bumped once per committed batch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_mark(&self, id: &str, mark: Mark) -> bool {
        self.marks.get(id).is_some_and(|set| set.contains(&mark))
    }

    pub fn marked(&self, mark: Mark) -> Vec<&str> {
        self.marks
            .iter()
            .filter(|(_, set)| set.contains(&mark))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        !self.has_mark(id, Mark::Hidden) && !self.has_mark(id, Mark::FilteredOut)
    }

    /// Live degree of a node: incident edge endpoints, self-loops twice.
    pub fn degree(&self, id: &str) -> usize {
        self.elements
            .edges
            .iter()
            .map(|e| (e.source == id) as usize + (e.target == id) as usize)
            .sum()
    }

    pub fn neighborhood(&self, id: &str) -> Neighborhood {
        let Some(&idx) = self.node_indices.get(id) else {
            return Neighborhood::default();
        };

        let mut hood = Neighborhood::default();
        let mut seen_nodes = HashSet::new();
        let mut seen_edges = HashSet::new();

        for dir in [Direction::Outgoing, Direction::Incoming] {
            for edge in self.graph.edges_directed(idx, dir) {
                if seen_edges.insert(edge.id()) {
                    hood.edges.push(edge.weight().clone());
                }
                let other = match dir {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                if other != idx && seen_nodes.insert(other) {
                    hood.nodes.push(self.graph[other].clone());
                }
            }
        }

        hood
    }

    /// Transitive predecessors (everything that can reach `id`).
    pub fn ancestors(&self, id: &str) -> HashSet<String> {
        self.closure(id, Direction::Incoming)
    }

    /// Transitive successors (everything reachable from `id`).
    pub fn descendants(&self, id: &str) -> HashSet<String> {
        self.closure(id, Direction::Outgoing)
    }

    /// Reachability closure as a visited-set BFS; cycles terminate because
    /// each index is enqueued at most once.
    fn closure(&self, start: &str, dir: Direction) -> HashSet<String> {
        let mut result = HashSet::new();
        let Some(&start_idx) = self.node_indices.get(start) else {
            return result;
        };

        let mut visited: HashSet<NodeIndex> = HashSet::from([start_idx]);
        let mut queue = VecDeque::from([start_idx]);

        while let Some(idx) = queue.pop_front() {
            for neighbor in self.graph.neighbors_directed(idx, dir) {
                if visited.insert(neighbor) {
                    result.insert(self.graph[neighbor].clone());
                    queue.push_back(neighbor);
                }
            }
        }

        result
    }

    /// Run a batch of mark mutations atomically. Ops apply in insertion
    /// order; the generation advances once regardless of op count.
    pub fn batch<F: FnOnce(&mut Batch)>(&mut self, f: F) {
        let mut batch = Batch::default();
        f(&mut batch);

        for op in batch.ops {
            match op {
                Op::Add(id, mark) => {
                    self.marks.entry(id).or_default().insert(mark);
                }
                Op::Remove(id, mark) => {
                    if let Some(set) = self.marks.get_mut(&id) {
                        set.remove(&mark);
                    }
                }
                Op::Clear(mark) => {
                    for set in self.marks.values_mut() {
                        set.remove(&mark);
                    }
                }
            }
        }

        self.marks.retain(|_, set| !set.is_empty());
        self.generation += 1;
    }
}

enum Op {
    Add(String, Mark),
    Remove(String, Mark),
    Clear(Mark),
}

#[derive(Default)]
pub struct Batch {
    ops: Vec<Op>,
}

impl Batch {
    pub fn add(&mut self, id: &str, mark: Mark) {
        self.ops.push(Op::Add(id.to_string(), mark));
    }

    pub fn remove(&mut self, id: &str, mark: Mark) {
        self.ops.push(Op::Remove(id.to_string(), mark));
    }

    /// Remove a mark from every element.
    pub fn clear(&mut self, mark: Mark) {
        self.ops.push(Op::Clear(mark));
    }
}
