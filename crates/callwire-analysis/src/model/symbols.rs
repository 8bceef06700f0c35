//! Declaration arena and per-file binding tables.
//!
//! Every declaration the engine can refer to gets a [`DeclId`] when the index
//! is built. Later passes only ever compare ids, never names.

use callwire_core::types::collections::FxHashMap;
use tree_sitter::Node;

use super::syntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportId(pub u32);

impl ImportId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Class,
    Interface,
    Enum,
    Variable,
    Method,
    /// `get`/`set` accessor. Typed through its return annotation, never a callable.
    Accessor,
    /// Class field or constructor parameter property.
    Property,
}

/// A declaration backed by a syntax node.
#[derive(Debug, Clone)]
pub struct Decl<'m> {
    pub id: DeclId,
    pub kind: DeclKind,
    pub name: String,
    pub file: FileId,
    /// `function_declaration`, `class_declaration`, `variable_declarator`,
    /// `method_definition`, `public_field_definition` or `required_parameter`.
    pub node: Node<'m>,
    /// Owning class for members.
    pub container: Option<DeclId>,
    pub is_static: bool,
}

impl<'m> Decl<'m> {
    /// Initializer of a variable, field or parameter.
    pub fn value(&self) -> Option<Node<'m>> {
        self.node.child_by_field_name("value")
    }

    /// Declared type annotation.
    pub fn annotation(&self) -> Option<Node<'m>> {
        self.node.child_by_field_name("type")
    }

    /// The function-like node that carries this declaration's body, if any.
    pub fn function_node(&self) -> Option<Node<'m>> {
        match self.kind {
            DeclKind::Function | DeclKind::Method | DeclKind::Accessor => Some(self.node),
            DeclKind::Variable | DeclKind::Property => self
                .value()
                .map(syntax::unwrap_expression)
                .filter(|v| syntax::is_function_value(v.kind())),
            DeclKind::Class | DeclKind::Interface | DeclKind::Enum => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Decl(DeclId),
    Import(ImportId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Named(String),
    Default,
    Namespace,
}

/// One imported name, or one re-exported name.
#[derive(Debug, Clone)]
pub struct ImportBinding {
    pub file: FileId,
    pub source: String,
    pub imported: Imported,
}

#[derive(Debug, Clone)]
pub enum ExportTarget {
    /// `export { a }` / `export const a`: look `a` up in the file's bindings.
    Local(String),
    /// `export default function () {}`.
    Decl(DeclId),
    /// `export { a } from './x'`, `export * as ns from './x'`.
    ReExport(ImportId),
}

/// Top-level bindings and exports of one file.
#[derive(Debug, Default)]
pub struct FileScope {
    pub bindings: FxHashMap<String, Binding>,
    pub exports: FxHashMap<String, ExportTarget>,
    /// Specifiers of `export * from '…'`.
    pub star_exports: Vec<String>,
    /// Top-level declarations in source order.
    pub top_level: Vec<DeclId>,
}

/// The declaration arena plus per-file scopes.
#[derive(Debug, Default)]
pub struct SymbolIndex<'m> {
    decls: Vec<Decl<'m>>,
    imports: Vec<ImportBinding>,
    scopes: Vec<FileScope>,
    members: FxHashMap<DeclId, Vec<DeclId>>,
    by_node: FxHashMap<(FileId, usize), DeclId>,
}

impl<'m> SymbolIndex<'m> {
    pub fn decl(&self, id: DeclId) -> &Decl<'m> {
        &self.decls[id.index()]
    }

    pub fn decls(&self) -> &[Decl<'m>] {
        &self.decls
    }

    pub fn import(&self, id: ImportId) -> &ImportBinding {
        &self.imports[id.index()]
    }

    pub fn scope(&self, file: FileId) -> &FileScope {
        &self.scopes[file.index()]
    }

    /// Members of a class in source order.
    pub fn members(&self, class: DeclId) -> &[DeclId] {
        self.members.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declaration whose node is `node`, if it was indexed.
    pub fn decl_at(&self, file: FileId, node: Node<'_>) -> Option<DeclId> {
        self.by_node.get(&(file, node.id())).copied()
    }

    /// Index one file. Files must be added in `FileId` order.
    pub(crate) fn add_file(&mut self, file: FileId, root: Node<'m>, source: &str) {
        debug_assert_eq!(file.index(), self.scopes.len());
        self.scopes.push(FileScope::default());
        let mut indexer = FileIndexer {
            index: self,
            file,
            source,
        };
        for stmt in syntax::named_children(root) {
            indexer.statement(stmt);
        }
    }

    fn push_decl(
        &mut self,
        kind: DeclKind,
        name: String,
        file: FileId,
        node: Node<'m>,
        container: Option<DeclId>,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let is_static = container.is_some() && syntax::is_static(node);
        self.decls.push(Decl {
            id,
            kind,
            name,
            file,
            node,
            container,
            is_static,
        });
        self.by_node.insert((file, node.id()), id);
        if let Some(class) = container {
            self.members.entry(class).or_default().push(id);
        }
        id
    }

    fn push_import(&mut self, file: FileId, source: String, imported: Imported) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        self.imports.push(ImportBinding {
            file,
            source,
            imported,
        });
        id
    }
}

struct FileIndexer<'i, 'm, 's> {
    index: &'i mut SymbolIndex<'m>,
    file: FileId,
    source: &'s str,
}

impl<'i, 'm, 's> FileIndexer<'i, 'm, 's> {
    fn scope(&mut self) -> &mut FileScope {
        let file = self.file.index();
        &mut self.index.scopes[file]
    }

    fn text(&self, node: Node<'_>) -> String {
        syntax::text(node, self.source).to_string()
    }

    /// Index a top-level statement and return the names it declares.
    fn statement(&mut self, stmt: Node<'m>) -> Vec<String> {
        match stmt.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.named_decl(stmt, DeclKind::Function).into_iter().collect()
            }
            "class_declaration" | "abstract_class_declaration" => {
                let name = stmt.child_by_field_name("name").map(|n| self.text(n));
                match name {
                    Some(name) => {
                        self.class(stmt, name.clone(), true);
                        vec![name]
                    }
                    None => Vec::new(),
                }
            }
            "interface_declaration" => self.named_decl(stmt, DeclKind::Interface).into_iter().collect(),
            "enum_declaration" => self.named_decl(stmt, DeclKind::Enum).into_iter().collect(),
            "lexical_declaration" | "variable_declaration" => self.variables(stmt),
            "import_statement" => {
                self.import(stmt);
                Vec::new()
            }
            "export_statement" => {
                self.export(stmt);
                Vec::new()
            }
            "ambient_declaration" => match syntax::first_named_child(stmt) {
                Some(inner) => self.statement(inner),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn named_decl(&mut self, node: Node<'m>, kind: DeclKind) -> Option<String> {
        let name = self.text(node.child_by_field_name("name")?);
        let id = self
            .index
            .push_decl(kind, name.clone(), self.file, node, None);
        self.bind_top_level(&name, id);
        Some(name)
    }

    fn bind_top_level(&mut self, name: &str, id: DeclId) {
        let scope = self.scope();
        scope.bindings.insert(name.to_string(), Binding::Decl(id));
        scope.top_level.push(id);
    }

    fn variables(&mut self, stmt: Node<'m>) -> Vec<String> {
        let mut names = Vec::new();
        for declarator in syntax::named_children(stmt) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            // Destructuring declarations carry no callable and no useful type.
            if name_node.kind() != "identifier" {
                continue;
            }
            let name = self.text(name_node);
            let id = self
                .index
                .push_decl(DeclKind::Variable, name.clone(), self.file, declarator, None);
            self.bind_top_level(&name, id);
            names.push(name);
        }
        names
    }

    fn class(&mut self, node: Node<'m>, name: String, bind: bool) -> DeclId {
        let id = self
            .index
            .push_decl(DeclKind::Class, name.clone(), self.file, node, None);
        if bind {
            self.bind_top_level(&name, id);
        } else {
            self.scope().top_level.push(id);
        }
        if let Some(body) = node.child_by_field_name("body") {
            for member in syntax::named_children(body) {
                self.class_member(id, member);
            }
        }
        id
    }

    fn class_member(&mut self, class: DeclId, member: Node<'m>) {
        let name = member
            .child_by_field_name("name")
            .and_then(|n| syntax::member_name(n, self.source));
        match member.kind() {
            "method_definition" => {
                let Some(name) = name else { return };
                if name == "constructor" && !syntax::is_static(member) {
                    self.parameter_properties(class, member);
                    return;
                }
                let kind = if syntax::has_child_kind(member, "get")
                    || syntax::has_child_kind(member, "set")
                {
                    DeclKind::Accessor
                } else {
                    DeclKind::Method
                };
                self.index
                    .push_decl(kind, name, self.file, member, Some(class));
            }
            "public_field_definition" | "field_definition" => {
                let Some(name) = name.or_else(|| {
                    // JavaScript grammar names fields through `property`.
                    member
                        .child_by_field_name("property")
                        .and_then(|n| syntax::member_name(n, self.source))
                }) else {
                    return;
                };
                self.index
                    .push_decl(DeclKind::Property, name, self.file, member, Some(class));
            }
            _ => {}
        }
    }

    /// `constructor(private readonly repo: Repo)` declares a `repo` field.
    fn parameter_properties(&mut self, class: DeclId, constructor: Node<'m>) {
        for param in syntax::parameters(constructor) {
            let is_property = syntax::has_child_kind(param, "accessibility_modifier")
                || syntax::has_child_kind(param, "readonly")
                || syntax::has_child_kind(param, "override_modifier");
            if !is_property {
                continue;
            }
            let Some(pattern) = syntax::parameter_pattern(param) else {
                continue;
            };
            if pattern.kind() != "identifier" {
                continue;
            }
            let name = self.text(pattern);
            self.index
                .push_decl(DeclKind::Property, name, self.file, param, Some(class));
        }
    }

    fn import(&mut self, stmt: Node<'m>) {
        let Some(source) = stmt
            .child_by_field_name("source")
            .map(|s| syntax::unquote(syntax::text(s, self.source)).to_string())
        else {
            return;
        };
        for child in syntax::named_children(stmt) {
            match child.kind() {
                "import_clause" => self.import_clause(child, &source),
                // `import fs = require('fs')`
                "import_require_clause" => {
                    if let Some(ident) = syntax::first_named_child(child) {
                        let local = self.text(ident);
                        self.bind_import(local, &source, Imported::Namespace);
                    }
                }
                _ => {}
            }
        }
    }

    fn import_clause(&mut self, clause: Node<'m>, source: &str) {
        for part in syntax::named_children(clause) {
            match part.kind() {
                "identifier" => {
                    let local = self.text(part);
                    self.bind_import(local, source, Imported::Default);
                }
                "namespace_import" => {
                    if let Some(ident) = syntax::first_named_child(part) {
                        let local = self.text(ident);
                        self.bind_import(local, source, Imported::Namespace);
                    }
                }
                "named_imports" => {
                    for specifier in syntax::named_children(part) {
                        if specifier.kind() != "import_specifier" {
                            continue;
                        }
                        let Some(name) = specifier
                            .child_by_field_name("name")
                            .and_then(|n| syntax::member_name(n, self.source))
                        else {
                            continue;
                        };
                        let local = specifier
                            .child_by_field_name("alias")
                            .map(|a| self.text(a))
                            .unwrap_or_else(|| name.clone());
                        let imported = if name == "default" {
                            Imported::Default
                        } else {
                            Imported::Named(name)
                        };
                        self.bind_import(local, source, imported);
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_import(&mut self, local: String, source: &str, imported: Imported) {
        let id = self
            .index
            .push_import(self.file, source.to_string(), imported);
        self.scope().bindings.insert(local, Binding::Import(id));
    }

    fn export(&mut self, stmt: Node<'m>) {
        let is_default = syntax::has_child_kind(stmt, "default");

        if let Some(declaration) = stmt.child_by_field_name("declaration") {
            let names = self.statement(declaration);
            let scope = self.scope();
            for name in &names {
                scope
                    .exports
                    .insert(name.clone(), ExportTarget::Local(name.clone()));
            }
            if is_default {
                if let Some(name) = names.into_iter().next() {
                    scope
                        .exports
                        .insert("default".to_string(), ExportTarget::Local(name));
                }
            }
            return;
        }

        if let Some(value) = stmt.child_by_field_name("value") {
            self.export_default_value(value);
            return;
        }

        let source = stmt
            .child_by_field_name("source")
            .map(|s| syntax::unquote(syntax::text(s, self.source)).to_string());
        let clause = syntax::named_children(stmt)
            .into_iter()
            .find(|c| matches!(c.kind(), "export_clause" | "namespace_export"));

        match (clause, source) {
            (Some(clause), source) if clause.kind() == "export_clause" => {
                for specifier in syntax::named_children(clause) {
                    if specifier.kind() != "export_specifier" {
                        continue;
                    }
                    let Some(name) = specifier
                        .child_by_field_name("name")
                        .and_then(|n| syntax::member_name(n, self.source))
                    else {
                        continue;
                    };
                    let exported = specifier
                        .child_by_field_name("alias")
                        .and_then(|a| syntax::member_name(a, self.source))
                        .unwrap_or_else(|| name.clone());
                    let target = match &source {
                        Some(source) => {
                            let imported = if name == "default" {
                                Imported::Default
                            } else {
                                Imported::Named(name)
                            };
                            ExportTarget::ReExport(self.index.push_import(
                                self.file,
                                source.clone(),
                                imported,
                            ))
                        }
                        None => ExportTarget::Local(name),
                    };
                    self.scope().exports.insert(exported, target);
                }
            }
            // `export * as ns from './x'`
            (Some(clause), Some(source)) => {
                if let Some(alias) = syntax::first_named_child(clause)
                    .and_then(|n| syntax::member_name(n, self.source))
                {
                    let id = self
                        .index
                        .push_import(self.file, source, Imported::Namespace);
                    self.scope().exports.insert(alias, ExportTarget::ReExport(id));
                }
            }
            (None, Some(source)) => self.scope().star_exports.push(source),
            _ => {}
        }
    }

    fn export_default_value(&mut self, value: Node<'m>) {
        let value = syntax::unwrap_expression(value);
        let target = match value.kind() {
            "identifier" => ExportTarget::Local(self.text(value)),
            kind if syntax::is_function_value(kind) => {
                let name = value
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_else(|| "<anon>".to_string());
                let id = self
                    .index
                    .push_decl(DeclKind::Function, name, self.file, value, None);
                self.scope().top_level.push(id);
                ExportTarget::Decl(id)
            }
            "class" => {
                let name = value
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_else(|| "default".to_string());
                ExportTarget::Decl(self.class(value, name, false))
            }
            _ => return,
        };
        self.scope().exports.insert("default".to_string(), target);
    }
}
