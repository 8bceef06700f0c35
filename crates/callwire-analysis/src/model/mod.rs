//! Program model: parsed files plus the symbol-resolution service over them.
//!
//! [`ProgramModel`] owns every parsed tree for one analysis call. [`Program`]
//! borrows it and adds the declaration index; the collector and both
//! resolvers only ever see a `&Program`.

pub mod builder;
pub mod paths;
pub mod resolver;
pub mod symbols;
pub mod syntax;

use callwire_core::errors::AnalysisError;
use callwire_core::types::collections::{FxHashMap, FxHashSet, SmallVec2};
use tree_sitter::Node;

use crate::parsers::ParseOutput;

pub use resolver::{Symbol, Ty};
pub use symbols::{Decl, DeclId, DeclKind, FileId, SymbolIndex};

/// One successfully parsed file.
#[derive(Debug)]
pub struct SourceFile {
    pub id: FileId,
    /// Path exactly as given in the input mapping.
    pub path: String,
    pub normalized: String,
    /// Path relative to the project root.
    pub simplified: String,
    pub file_key: String,
    pub source: String,
    pub parsed: ParseOutput,
}

/// Parsed trees for exactly the files of one input mapping.
#[derive(Debug, Default)]
pub struct ProgramModel {
    files: Vec<SourceFile>,
    by_path: FxHashMap<String, FileId>,
    input_paths: FxHashSet<String>,
    project_root: String,
    module_roots: Vec<String>,
    errors: Vec<AnalysisError>,
}

impl ProgramModel {
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    /// Look a file up by any spelling of its path.
    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.by_path.get(&paths::normalize_path(path)).copied()
    }

    /// Whether `path` was part of the input, parsed or not.
    pub fn was_input(&self, path: &str) -> bool {
        self.input_paths.contains(&paths::normalize_path(path))
    }

    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Non-fatal errors recorded while building the model.
    pub fn errors(&self) -> &[AnalysisError] {
        &self.errors
    }

    /// Whether two files have different simplified paths.
    pub fn is_cross_file(&self, a: FileId, b: FileId) -> bool {
        self.file(a).simplified != self.file(b).simplified
    }

    /// Resolve an import specifier written in `from` to a modeled file.
    ///
    /// Specifiers that name nothing in the model are external.
    pub fn resolve_module(&self, from: FileId, specifier: &str) -> Option<FileId> {
        if paths::is_relative_specifier(specifier) {
            let dir = paths::parent_dir(&self.file(from).normalized);
            return self.first_candidate(&paths::join(dir, specifier));
        }
        if specifier.starts_with('/') {
            return self.first_candidate(&paths::normalize_path(specifier));
        }
        self.module_roots
            .iter()
            .find_map(|root| self.first_candidate(&paths::join(root, specifier)))
    }

    fn first_candidate(&self, base: &str) -> Option<FileId> {
        paths::candidates(base)
            .iter()
            .find_map(|candidate| self.by_path.get(candidate).copied())
    }
}

/// The resolution context for one run: the model plus its declaration index.
pub struct Program<'m> {
    model: &'m ProgramModel,
    symbols: SymbolIndex<'m>,
}

impl<'m> Program<'m> {
    pub fn new(model: &'m ProgramModel) -> Self {
        let mut symbols = SymbolIndex::default();
        for file in model.files() {
            symbols.add_file(file.id, file.parsed.tree.root_node(), &file.source);
        }
        tracing::debug!(
            files = model.files().len(),
            decls = symbols.decls().len(),
            "symbol index built"
        );
        Self { model, symbols }
    }

    pub fn model(&self) -> &'m ProgramModel {
        self.model
    }

    pub fn symbols(&self) -> &SymbolIndex<'m> {
        &self.symbols
    }

    pub fn decl(&self, id: DeclId) -> &Decl<'m> {
        self.symbols.decl(id)
    }

    pub fn file(&self, id: FileId) -> &'m SourceFile {
        self.model.file(id)
    }

    /// Source text of a node in `file`.
    pub fn text(&self, file: FileId, node: Node<'_>) -> &'m str {
        syntax::text(node, &self.model.file(file).source)
    }

    /// Decorator names on a class declaration, in source order.
    pub fn class_decorators(&self, class: DeclId) -> SmallVec2<&'m str> {
        let decl = self.decl(class);
        let source = &self.model.file(decl.file).source;
        syntax::decorators(decl.node)
            .into_iter()
            .filter_map(|d| syntax::decorator_name(d, source))
            .collect()
    }
}
