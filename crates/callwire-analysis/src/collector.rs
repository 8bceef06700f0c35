//! Collects every callable declared in the scanned files.

use callwire_core::config::ConventionsConfig;
use callwire_core::types::collections::{FxHashMap, SmallVec4};
use tracing::debug;
use tree_sitter::Node;

use crate::call_graph::types::{GraphNode, NodeKind};
use crate::identity::{self, IdAllocator};
use crate::model::{syntax, Decl, DeclId, DeclKind, FileId, Program};
use crate::roles::{self, ClassFacts, Role};

/// A function-like entity backed by exactly one declaration.
#[derive(Debug, Clone)]
pub struct Callable<'m> {
    pub id: String,
    pub name: String,
    pub qualified_name: String,
    pub file: FileId,
    pub class_name: Option<String>,
    pub kind: NodeKind,
    pub is_async: bool,
    pub role: Option<Role>,
    pub decl: DeclId,
    /// The function-like node whose body holds the call sites.
    pub function: Node<'m>,
}

impl Callable<'_> {
    pub fn to_node(&self, program: &Program<'_>) -> GraphNode {
        let file = program.file(self.file);
        GraphNode {
            id: self.id.clone(),
            label: self.qualified_name.clone(),
            kind: self.kind,
            is_async: Some(self.is_async),
            file_path: file.path.clone(),
            file_key: file.file_key.clone(),
            class_name: self.class_name.clone(),
            role: self.role,
        }
    }
}

/// Collected callables and the declaration lookup.
#[derive(Debug, Default)]
pub struct CollectedCallables<'m> {
    pub callables: Vec<Callable<'m>>,
    by_decl: FxHashMap<DeclId, usize>,
}

impl<'m> CollectedCallables<'m> {
    /// The callable declared by `decl`.
    pub fn get(&self, decl: DeclId) -> Option<&Callable<'m>> {
        self.by_decl.get(&decl).map(|&idx| &self.callables[idx])
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }

    fn push(&mut self, callable: Callable<'m>) {
        self.by_decl.insert(callable.decl, self.callables.len());
        self.callables.push(callable);
    }
}

/// Walk the top-level declarations of `files`, in order, and collect callables.
pub fn collect_callables<'m>(
    program: &Program<'m>,
    files: &[FileId],
    conventions: &ConventionsConfig,
) -> CollectedCallables<'m> {
    let mut collector = Collector {
        program,
        conventions,
        ids: IdAllocator::new(),
        out: CollectedCallables::default(),
    };
    for &file in files {
        for &decl in &program.symbols().scope(file).top_level {
            collector.top_level(decl);
        }
    }
    debug!(callables = collector.out.len(), files = files.len(), "callables collected");
    collector.out
}

/// Role of a class declaration under the configured conventions.
pub fn class_role(program: &Program<'_>, class: DeclId, conventions: &ConventionsConfig) -> Option<Role> {
    let decl = program.decl(class);
    let decorators = program.class_decorators(class);
    roles::classify_class(
        &ClassFacts {
            name: &decl.name,
            decorators: &decorators,
            file_path: &program.file(decl.file).path,
        },
        conventions,
    )
}

struct Collector<'a, 'm> {
    program: &'a Program<'m>,
    conventions: &'a ConventionsConfig,
    ids: IdAllocator,
    out: CollectedCallables<'m>,
}

impl<'a, 'm> Collector<'a, 'm> {
    fn top_level(&mut self, id: DeclId) {
        let program = self.program;
        let decl = program.decl(id);
        match decl.kind {
            DeclKind::Function | DeclKind::Variable => {
                if let Some(function) = decl.function_node() {
                    self.add(decl, function, None, Some(Role::Helper));
                }
            }
            DeclKind::Class => {
                let role = class_role(program, id, self.conventions);
                for &member in program.symbols().members(id) {
                    let member = program.decl(member);
                    if !matches!(member.kind, DeclKind::Method | DeclKind::Property) {
                        continue;
                    }
                    if let Some(function) = member.function_node() {
                        self.add(member, function, Some(decl.name.as_str()), role);
                    }
                }
            }
            _ => {}
        }
    }

    fn add(&mut self, decl: &Decl<'m>, function: Node<'m>, class_name: Option<&str>, role: Option<Role>) {
        let Some(kind) = NodeKind::from_syntax(function.kind()) else {
            return;
        };
        let program = self.program;
        let file = program.file(decl.file);
        let name = if decl.name.is_empty() {
            "<anon>".to_string()
        } else {
            decl.name.clone()
        };
        let qualified_name = identity::qualified_name(class_name, &name);
        let param_types: SmallVec4<&str> = syntax::parameters(function)
            .into_iter()
            .map(|p| syntax::parameter_type_text(p, &file.source))
            .collect();
        let signature = identity::signature_key(&qualified_name, &param_types);
        let id = self
            .ids
            .allocate(identity::make_id(&file.path, &qualified_name, &signature));

        self.out.push(Callable {
            id,
            name,
            qualified_name,
            file: decl.file,
            class_name: class_name.map(str::to_string),
            kind,
            is_async: syntax::is_async(function),
            role,
            decl: decl.id,
            function,
        });
    }
}
