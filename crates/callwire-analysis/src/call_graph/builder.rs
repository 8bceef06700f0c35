//! Graph assembly with id/`(from, to)` deduplication.

use callwire_core::types::collections::FxHashMap;

use super::types::{Graph, GraphEdge, GraphNode};

/// Accumulates nodes and edges; a later insertion with the same key replaces
/// the earlier one in place, so first-insertion order is kept.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    node_index: FxHashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: FxHashMap<(String, String), usize>,
    self_edges_dropped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) {
        match self.node_index.get(&node.id) {
            Some(&idx) => self.nodes[idx] = node,
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Add an edge. Self-edges are dropped.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        if edge.from == edge.to {
            self.self_edges_dropped += 1;
            return;
        }
        let key = (edge.from.clone(), edge.to.clone());
        match self.edge_index.get(&key) {
            Some(&idx) => self.edges[idx] = edge,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    pub fn build(self) -> Graph {
        if self.self_edges_dropped > 0 {
            tracing::debug!(count = self.self_edges_dropped, "self-edges dropped");
        }
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Fold nodes and edges into a deduplicated graph.
pub fn assemble(
    nodes: impl IntoIterator<Item = GraphNode>,
    edges: impl IntoIterator<Item = GraphEdge>,
) -> Graph {
    let mut builder = GraphBuilder::new();
    for node in nodes {
        builder.add_node(node);
    }
    for edge in edges {
        builder.add_edge(edge);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::types::{EdgeKind, NodeKind};

    fn node(id: &str, label: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: label.to_string(),
            kind: NodeKind::Method,
            is_async: Some(false),
            file_path: "/p/a.ts".to_string(),
            file_key: "a.ts#000000".to_string(),
            class_name: None,
            role: None,
        }
    }

    fn edge(from: &str, to: &str, kind: EdgeKind) -> GraphEdge {
        GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            cross_file: false,
            kind,
        }
    }

    #[test]
    fn last_write_wins_in_first_position() {
        let graph = assemble(
            vec![node("a", "first"), node("b", "b"), node("a", "second")],
            vec![
                edge("a", "b", EdgeKind::Call),
                edge("b", "a", EdgeKind::Call),
                edge("a", "b", EdgeKind::Injects),
            ],
        );
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].label, "second");
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].kind, EdgeKind::Injects);
    }

    #[test]
    fn self_edges_are_dropped() {
        let graph = assemble(vec![node("a", "a")], vec![edge("a", "a", EdgeKind::Call)]);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn reassembly_is_idempotent() {
        let once = assemble(
            vec![node("a", "a"), node("b", "b"), node("a", "a2")],
            vec![edge("a", "b", EdgeKind::Call), edge("a", "b", EdgeKind::Call)],
        );
        let twice = assemble(once.nodes.clone(), once.edges.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_is_empty_graph() {
        let graph = assemble(Vec::new(), Vec::new());
        assert!(graph.is_empty());
    }
}
