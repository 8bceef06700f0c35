//! callwire-analysis: static analysis of TypeScript/NestJS sources.
//!
//! Builds a call graph between functions and methods, and a wiring graph of
//! framework modules, their controllers and providers, and the constructor
//! injection between them.
//!
//! ```no_run
//! use callwire_analysis::analyze_call_graph;
//!
//! let files = [("/app/a.ts", "export function util() {}"),
//!              ("/app/b.ts", "import { util } from './a'; export function run() { util(); }")];
//! let graph = analyze_call_graph(files, &["/app/a.ts", "/app/b.ts"]);
//! assert_eq!(graph.edges.len(), 1);
//! ```

pub mod analyzer;
pub mod call_graph;
pub mod collector;
pub mod identity;
pub mod model;
pub mod parsers;
pub mod roles;
pub mod wiring;

pub use analyzer::{analyze_call_graph, analyze_wiring, list_modules, Analyzer};
pub use call_graph::{EdgeKind, Graph, GraphEdge, GraphNode, NodeKind};
pub use roles::Role;
