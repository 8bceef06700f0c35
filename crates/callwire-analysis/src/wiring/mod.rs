//! Wiring graph: modules, the controllers and providers they declare, and
//! constructor injection between those classes.

pub mod injection;
pub mod metadata;

use callwire_core::config::ConventionsConfig;
use callwire_core::types::collections::FxHashMap;
use tracing::{debug, info};

use crate::call_graph::types::{EdgeKind, Graph, GraphEdge, GraphNode, NodeKind};
use crate::call_graph::GraphBuilder;
use crate::identity;
use crate::model::{DeclId, DeclKind, FileId, Program};
use crate::roles::{self, ClassFacts, Role};

pub use injection::{constructor_dependencies, first_constructor};
pub use metadata::{read_module_metadata, ModuleMetadata};

/// Module classes declared at the top level of `files`, in file then source order.
pub fn find_modules(
    program: &Program<'_>,
    files: &[FileId],
    conventions: &ConventionsConfig,
) -> Vec<DeclId> {
    files
        .iter()
        .flat_map(|&file| program.symbols().scope(file).top_level.iter().copied())
        .filter(|&id| program.decl(id).kind == DeclKind::Class)
        .filter(|&id| is_module(program, id, conventions))
        .collect()
}

/// Whether a class is a module: a module decorator or a module file name.
pub fn is_module(program: &Program<'_>, class: DeclId, conventions: &ConventionsConfig) -> bool {
    let decl = program.decl(class);
    let decorators = program.class_decorators(class);
    roles::is_module_class(
        &ClassFacts {
            name: &decl.name,
            decorators: &decorators,
            file_path: &program.file(decl.file).path,
        },
        conventions,
    )
}

/// Graph node for a class.
pub fn class_node(program: &Program<'_>, class: DeclId, role: Role) -> GraphNode {
    let decl = program.decl(class);
    let file = program.file(decl.file);
    GraphNode {
        id: identity::make_id(&file.path, &decl.name, &format!("class {}", decl.name)),
        label: decl.name.clone(),
        kind: NodeKind::Class,
        is_async: None,
        file_path: file.path.clone(),
        file_key: file.file_key.clone(),
        class_name: Some(decl.name.clone()),
        role: Some(role),
    }
}

/// One node per module declared in `files`, no edges.
pub fn build_module_nodes(
    program: &Program<'_>,
    files: &[FileId],
    conventions: &ConventionsConfig,
) -> Graph {
    let mut builder = GraphBuilder::new();
    for module in find_modules(program, files, conventions) {
        builder.add_node(class_node(program, module, Role::Module));
    }
    let graph = builder.build();
    info!(modules = graph.nodes.len(), "module nodes built");
    graph
}

/// The full wiring graph of the modules declared in `files`.
pub fn build_wiring_graph(
    program: &Program<'_>,
    files: &[FileId],
    conventions: &ConventionsConfig,
) -> Graph {
    let mut wiring = WiringResolver {
        program,
        conventions,
        builder: GraphBuilder::new(),
        nodes: FxHashMap::default(),
        order: Vec::new(),
    };

    let modules = find_modules(program, files, conventions);
    for &module in &modules {
        wiring.add_class(module, Role::Module);
    }
    for &module in &modules {
        wiring.module_edges(module);
    }
    wiring.injection_edges();

    let graph = wiring.builder.build();
    info!(
        modules = modules.len(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "wiring graph built"
    );
    graph
}

struct WiringResolver<'a, 'm> {
    program: &'a Program<'m>,
    conventions: &'a ConventionsConfig,
    builder: GraphBuilder,
    /// Class -> (node id, role).
    nodes: FxHashMap<DeclId, (String, Role)>,
    order: Vec<DeclId>,
}

impl WiringResolver<'_, '_> {
    /// Add a class node once; a class reached again keeps its first node.
    fn add_class(&mut self, class: DeclId, role: Role) -> String {
        if let Some((id, _)) = self.nodes.get(&class) {
            return id.clone();
        }
        let node = class_node(self.program, class, role);
        let id = node.id.clone();
        self.builder.add_node(node);
        self.nodes.insert(class, (id.clone(), role));
        self.order.push(class);
        id
    }

    fn add_edge(&mut self, from: DeclId, to: DeclId, kind: EdgeKind) {
        let (Some((from_id, _)), Some((to_id, _))) = (self.nodes.get(&from), self.nodes.get(&to)) else {
            return;
        };
        let program = self.program;
        let edge = GraphEdge {
            from: from_id.clone(),
            to: to_id.clone(),
            cross_file: program
                .model()
                .is_cross_file(program.decl(from).file, program.decl(to).file),
            kind,
        };
        self.builder.add_edge(edge);
    }

    fn module_edges(&mut self, module: DeclId) {
        let metadata = read_module_metadata(self.program, module, self.conventions);
        if metadata.is_empty() {
            debug!(module = %self.program.decl(module).name, "module declares no metadata");
        }

        for &imported in &metadata.imports {
            if !is_module(self.program, imported, self.conventions) {
                debug!(class = %self.program.decl(imported).name, "import is not a module, skipped");
                continue;
            }
            self.add_class(imported, Role::Module);
            self.add_edge(module, imported, EdgeKind::Imports);
        }

        for &member in metadata.controllers.iter().chain(&metadata.providers) {
            if is_module(self.program, member, self.conventions) {
                continue;
            }
            let decorators = self.program.class_decorators(member);
            let role = roles::wiring_role(&decorators, self.conventions);
            self.add_class(member, role);
            self.add_edge(module, member, EdgeKind::Contains);
        }
    }

    fn injection_edges(&mut self) {
        let classes: Vec<DeclId> = self
            .order
            .iter()
            .copied()
            .filter(|c| self.nodes.get(c).is_some_and(|(_, role)| *role != Role::Module))
            .collect();
        for class in classes {
            for dependency in constructor_dependencies(self.program, class, self.conventions) {
                if dependency != class && self.nodes.contains_key(&dependency) {
                    self.add_edge(class, dependency, EdgeKind::Injects);
                }
            }
        }
    }
}
