//! Call-site resolution: every call expression in a callable's body is
//! mapped back to a collected callable, or dropped.

use callwire_core::types::collections::FxHashMap;
use tree_sitter::Node;

use super::types::{EdgeKind, GraphEdge};
use crate::collector::{Callable, CollectedCallables};
use crate::model::{syntax, Program, Symbol};

/// How a call site names its callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStrategy {
    /// `helper()`
    Identifier,
    /// `this.repo.find()`
    Property,
    /// `obj["run"]()`
    Element,
    /// Anything else: `(await f())()`, IIFEs, tagged templates.
    Other,
}

impl CallStrategy {
    pub fn of(callee: Node<'_>) -> Self {
        match syntax::unwrap_expression(callee).kind() {
            "identifier" => Self::Identifier,
            "member_expression" => Self::Property,
            "subscript_expression" => Self::Element,
            _ => Self::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Property => "property",
            Self::Element => "element",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for CallStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Counters describing how well call sites resolved in one run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionDiagnostics {
    pub total_call_sites: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Calls that resolved to the calling callable itself.
    pub recursive: usize,
    /// `(resolved, total)` per strategy.
    pub by_strategy: FxHashMap<CallStrategy, (usize, usize)>,
}

impl ResolutionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, strategy: CallStrategy, resolved: bool) {
        self.total_call_sites += 1;
        let entry = self.by_strategy.entry(strategy).or_insert((0, 0));
        entry.1 += 1;
        if resolved {
            self.resolved += 1;
            entry.0 += 1;
        } else {
            self.unresolved += 1;
        }
    }

    pub fn resolution_rate(&self) -> f64 {
        if self.total_call_sites == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total_call_sites as f64
        }
    }

    /// Emit the counters at debug level, one line per strategy.
    pub fn log(&self) {
        let mut strategies: Vec<_> = self.by_strategy.iter().collect();
        strategies.sort_by_key(|(s, _)| s.name());
        for (strategy, (resolved, total)) in strategies {
            tracing::debug!(strategy = %strategy, resolved, total, "call resolution by strategy");
        }
    }
}

/// Resolve every call site of every collected callable.
pub fn resolve_calls<'m>(
    program: &Program<'m>,
    collected: &CollectedCallables<'m>,
) -> (Vec<GraphEdge>, ResolutionDiagnostics) {
    let mut edges = Vec::new();
    let mut diagnostics = ResolutionDiagnostics::new();
    for caller in &collected.callables {
        for call in call_sites(caller.function) {
            let strategy = call
                .child_by_field_name("function")
                .map(CallStrategy::of)
                .unwrap_or(CallStrategy::Other);
            let callee = match program.callee_symbol(caller.file, call) {
                Some(Symbol::Decl(decl)) => collected.get(decl),
                _ => None,
            };
            diagnostics.record(strategy, callee.is_some());
            match callee {
                Some(callee) if callee.id == caller.id => diagnostics.recursive += 1,
                Some(callee) => edges.push(call_edge(program, caller, callee)),
                None => {}
            }
        }
    }
    (edges, diagnostics)
}

fn call_edge(program: &Program<'_>, caller: &Callable<'_>, callee: &Callable<'_>) -> GraphEdge {
    GraphEdge {
        from: caller.id.clone(),
        to: callee.id.clone(),
        cross_file: program.model().is_cross_file(caller.file, callee.file),
        kind: EdgeKind::Call,
    }
}

/// Every `call_expression` under the body of `function`, in source order.
///
/// Nested functions are included: their calls belong to the enclosing
/// callable since they are not callables themselves.
pub fn call_sites(function: Node<'_>) -> Vec<Node<'_>> {
    let Some(body) = function.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut sites = Vec::new();
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        if node.kind() == "call_expression" {
            sites.push(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    sites
}
