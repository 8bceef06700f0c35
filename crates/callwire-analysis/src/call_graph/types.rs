//! Graph types: nodes, edges, and the assembled graph.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use callwire_core::types::collections::FxHashMap;

use crate::roles::Role;

/// Syntactic kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    FunctionDeclaration,
    Method,
    FunctionExpression,
    ArrowFunction,
    Class,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FunctionDeclaration => "function_declaration",
            Self::Method => "method",
            Self::FunctionExpression => "function_expression",
            Self::ArrowFunction => "arrow_function",
            Self::Class => "class",
        }
    }

    /// Kind of a function-like syntax node, `None` for anything else.
    pub fn from_syntax(kind: &str) -> Option<Self> {
        match kind {
            "function_declaration" | "generator_function_declaration" => {
                Some(Self::FunctionDeclaration)
            }
            "method_definition" => Some(Self::Method),
            "function_expression" | "function" | "generator_function" => {
                Some(Self::FunctionExpression)
            }
            "arrow_function" => Some(Self::ArrowFunction),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of a call graph or wiring graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    pub file_path: String,
    pub file_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Relationship an edge stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Call,
    Contains,
    Imports,
    Injects,
}

impl EdgeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Contains => "contains",
            Self::Imports => "imports",
            Self::Injects => "injects",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub cross_file: bool,
    pub kind: EdgeKind,
}

/// An assembled, deduplicated graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// A petgraph view for layout and traversal.
    ///
    /// Edges whose endpoints are not nodes of this graph are left out.
    pub fn to_digraph(&self) -> DiGraph<&GraphNode, EdgeKind> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index: FxHashMap<&str, NodeIndex> = FxHashMap::default();
        for node in &self.nodes {
            index.insert(node.id.as_str(), graph.add_node(node));
        }
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                graph.add_edge(from, to, edge.kind);
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: id.to_string(),
            kind: NodeKind::FunctionDeclaration,
            is_async: Some(false),
            file_path: "/p/a.ts".to_string(),
            file_key: "a.ts#000000".to_string(),
            class_name: None,
            role: Some(Role::Helper),
        }
    }

    #[test]
    fn serializes_camel_case() {
        let graph = Graph {
            nodes: vec![node("a")],
            edges: vec![GraphEdge {
                from: "a".into(),
                to: "b".into(),
                cross_file: true,
                kind: EdgeKind::Call,
            }],
        };
        let json = graph.to_json().unwrap();
        assert!(json.contains("\"isAsync\":false"));
        assert!(json.contains("\"fileKey\""));
        assert!(json.contains("\"crossFile\":true"));
        assert!(json.contains("\"kind\":\"call\""));
        assert!(json.contains("\"kind\":\"function_declaration\""));
        assert!(!json.contains("className"));
    }

    #[test]
    fn digraph_skips_dangling_edges() {
        let graph = Graph {
            nodes: vec![node("a"), node("b")],
            edges: vec![
                GraphEdge {
                    from: "a".into(),
                    to: "b".into(),
                    cross_file: false,
                    kind: EdgeKind::Call,
                },
                GraphEdge {
                    from: "a".into(),
                    to: "missing".into(),
                    cross_file: false,
                    kind: EdgeKind::Call,
                },
            ],
        };
        let dg = graph.to_digraph();
        assert_eq!(dg.node_count(), 2);
        assert_eq!(dg.edge_count(), 1);
    }

    #[test]
    fn kind_from_syntax() {
        assert_eq!(NodeKind::from_syntax("method_definition"), Some(NodeKind::Method));
        assert_eq!(NodeKind::from_syntax("function"), Some(NodeKind::FunctionExpression));
        assert_eq!(NodeKind::from_syntax("class_declaration"), None);
    }
}
