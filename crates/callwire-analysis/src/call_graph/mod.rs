//! Call graph: callables as nodes, resolved call sites as edges.

pub mod builder;
pub mod resolution;
pub mod types;

use callwire_core::config::ConventionsConfig;
use tracing::info;

use crate::collector::collect_callables;
use crate::model::{FileId, Program};

pub use builder::{assemble, GraphBuilder};
pub use resolution::{CallStrategy, ResolutionDiagnostics};
pub use types::{EdgeKind, Graph, GraphEdge, GraphNode, NodeKind};

/// Build the call graph of `files`: collect, resolve, assemble.
pub fn build_call_graph(
    program: &Program<'_>,
    files: &[FileId],
    conventions: &ConventionsConfig,
) -> (Graph, ResolutionDiagnostics) {
    let collected = collect_callables(program, files, conventions);
    let (edges, diagnostics) = resolution::resolve_calls(program, &collected);
    let nodes = collected.callables.iter().map(|c| c.to_node(program));
    let graph = assemble(nodes, edges);

    info!(
        functions = graph.nodes.len(),
        edges = graph.edges.len(),
        call_sites = diagnostics.total_call_sites,
        resolution_rate = diagnostics.resolution_rate(),
        "call graph built"
    );
    diagnostics.log();
    (graph, diagnostics)
}
