//! Symbol resolution: scopes, alias chains, receiver typing, member lookup.
//!
//! This is intentionally shallow. It knows enough about TypeScript to map a
//! call site back to a declaration when the receiver's class is evident from
//! an annotation, an initializer, `this`, or an import. Anything else resolves
//! to `None` and the caller drops the call.

use callwire_core::types::collections::FxHashSet;
use tree_sitter::Node;

use super::symbols::{Binding, DeclId, DeclKind, ExportTarget, FileId, ImportId, Imported};
use super::{syntax, Program};

/// Longest import/re-export chain followed before giving up.
const MAX_ALIAS_HOPS: usize = 32;

/// Budget for jumps away from the expression being typed: into a binding's
/// annotation or initializer, a return type, or an `extends` clause.
/// Descending into sub-expressions is free since the tree bounds it.
const MAX_TYPE_DEPTH: usize = 24;

/// Type names unwrapped to their first type argument.
const PROMISE_TYPES: &[&str] = &["Promise", "PromiseLike"];

/// What an identifier or expression denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol<'m> {
    Decl(DeclId),
    Import(ImportId),
    /// A whole file, through a namespace import.
    Module(FileId),
    /// A parameter or block-scoped binding inside a function body.
    Local(FileId, Node<'m>),
}

/// The statically inferred type of a receiver expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty<'m> {
    /// An instance of a class.
    Instance(DeclId),
    /// The class constructor itself; members are the static ones.
    Static(DeclId),
    Module(FileId),
    /// An object literal.
    Object(FileId, Node<'m>),
    Unknown,
}

impl Ty<'_> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }
}

/// Which source of type information wins for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefer {
    Annotation,
    Initializer,
}

impl<'m> Program<'m> {
    // ---- Scopes ----

    /// Resolve an identifier node to the binding it refers to.
    pub fn resolve_identifier(&self, file: FileId, ident: Node<'m>) -> Option<Symbol<'m>> {
        let name = self.text(file, ident);
        self.lookup_name(file, ident, name)
    }

    /// Resolve `name` as seen from `from`: enclosing functions and blocks
    /// first, then the file's top-level bindings.
    pub fn lookup_name(&self, file: FileId, from: Node<'m>, name: &str) -> Option<Symbol<'m>> {
        let source = &self.file(file).source;
        let mut current = from.parent();
        while let Some(scope) = current {
            let kind = scope.kind();
            if kind == "program" {
                break;
            }
            if syntax::is_function_like(kind) {
                for param in syntax::parameters(scope) {
                    let pattern = syntax::parameter_pattern(param);
                    if let Some(ident) = pattern.and_then(|p| syntax::pattern_binding(p, name, source)) {
                        // Plain parameters keep the parameter node for its annotation.
                        let binding = if pattern == Some(ident) { param } else { ident };
                        return Some(Symbol::Local(file, binding));
                    }
                }
                if matches!(kind, "function_expression" | "function" | "generator_function") {
                    let own_name = scope.child_by_field_name("name");
                    if own_name.map(|n| syntax::text(n, source)) == Some(name) {
                        return Some(Symbol::Local(file, scope));
                    }
                }
            }
            if let Some(local) = block_binding(scope, name, source) {
                return Some(Symbol::Local(file, local));
            }
            current = scope.parent();
        }
        self.symbols()
            .scope(file)
            .bindings
            .get(name)
            .map(|binding| match *binding {
                Binding::Decl(id) => Symbol::Decl(id),
                Binding::Import(id) => Symbol::Import(id),
            })
    }

    // ---- Aliases ----

    /// Follow import and re-export links to the underlying symbol.
    ///
    /// Returns `None` for external modules, missing exports and cycles.
    pub fn resolve_alias(&self, symbol: Symbol<'m>) -> Option<Symbol<'m>> {
        let mut current = symbol;
        for _ in 0..MAX_ALIAS_HOPS {
            match current {
                Symbol::Import(id) => current = self.follow_import(id)?,
                other => return Some(other),
            }
        }
        tracing::debug!("alias chain too long or cyclic");
        None
    }

    fn follow_import(&self, id: ImportId) -> Option<Symbol<'m>> {
        let import = self.symbols().import(id);
        let target = self.model().resolve_module(import.file, &import.source)?;
        match &import.imported {
            Imported::Namespace => Some(Symbol::Module(target)),
            Imported::Default => self.export_symbol(target, "default"),
            Imported::Named(name) => self.export_symbol(target, name),
        }
    }

    /// The symbol a file exports under `name`, possibly still an import.
    pub fn export_symbol(&self, file: FileId, name: &str) -> Option<Symbol<'m>> {
        let mut visited = FxHashSet::default();
        self.export_symbol_in(file, name, &mut visited)
    }

    fn export_symbol_in(
        &self,
        file: FileId,
        name: &str,
        visited: &mut FxHashSet<FileId>,
    ) -> Option<Symbol<'m>> {
        if !visited.insert(file) {
            return None;
        }
        let scope = self.symbols().scope(file);
        if let Some(target) = scope.exports.get(name) {
            return match target {
                ExportTarget::Local(local) => scope.bindings.get(local).map(|b| match *b {
                    Binding::Decl(id) => Symbol::Decl(id),
                    Binding::Import(id) => Symbol::Import(id),
                }),
                ExportTarget::Decl(id) => Some(Symbol::Decl(*id)),
                ExportTarget::ReExport(id) => Some(Symbol::Import(*id)),
            };
        }
        // `export *` never forwards the default export.
        if name == "default" {
            return None;
        }
        scope.star_exports.iter().find_map(|specifier| {
            let target = self.model().resolve_module(file, specifier)?;
            self.export_symbol_in(target, name, visited)
        })
    }

    // ---- Expressions ----

    /// The declaration invoked by a `call_expression`, aliases unwrapped.
    pub fn callee_symbol(&self, file: FileId, call: Node<'m>) -> Option<Symbol<'m>> {
        let callee = call.child_by_field_name("function")?;
        self.expression_symbol(file, callee)
    }

    /// What an identifier, member or element access expression denotes.
    pub fn expression_symbol(&self, file: FileId, expr: Node<'m>) -> Option<Symbol<'m>> {
        self.expression_symbol_at(file, expr, 0)
    }

    fn expression_symbol_at(&self, file: FileId, expr: Node<'m>, depth: usize) -> Option<Symbol<'m>> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        let expr = syntax::unwrap_expression(expr);
        let symbol = match expr.kind() {
            "identifier" => self.resolve_identifier(file, expr)?,
            "member_expression" => {
                let object = expr.child_by_field_name("object")?;
                let property = expr.child_by_field_name("property")?;
                let name = self.text(file, property);
                let receiver = self.type_of(file, object, Prefer::Annotation, depth);
                self.lookup_member_at(receiver, name, depth)?
            }
            "subscript_expression" => {
                let object = expr.child_by_field_name("object")?;
                let index = expr.child_by_field_name("index")?;
                let key = self.literal_key(file, index)?;
                let receiver = self.type_of(file, object, Prefer::Annotation, depth);
                match self.lookup_member_at(receiver, &key, depth) {
                    Some(found) => found,
                    None => {
                        let fallback = self.type_of(file, object, Prefer::Initializer, depth);
                        if fallback == receiver {
                            return None;
                        }
                        self.lookup_member_at(fallback, &key, depth)?
                    }
                }
            }
            _ => return None,
        };
        self.resolve_alias(symbol)
    }

    /// String value of an element-access key, when statically known.
    pub fn literal_key(&self, file: FileId, index: Node<'m>) -> Option<String> {
        let source = &self.file(file).source;
        let index = syntax::unwrap_expression(index);
        if let Some(value) = syntax::literal_value(index, source) {
            return Some(value);
        }
        if index.kind() != "identifier" {
            return None;
        }
        let (owner, declarator) = match self.resolve_alias(self.resolve_identifier(file, index)?)? {
            Symbol::Decl(id) => {
                let decl = self.decl(id);
                if decl.kind != DeclKind::Variable {
                    return None;
                }
                (decl.file, decl.node)
            }
            Symbol::Local(local_file, node) if node.kind() == "variable_declarator" => {
                (local_file, node)
            }
            _ => return None,
        };
        if !syntax::is_const_declarator(declarator) {
            return None;
        }
        let value = syntax::unwrap_expression(declarator.child_by_field_name("value")?);
        match value.kind() {
            "string" | "template_string" => syntax::literal_value(value, &self.file(owner).source),
            _ => None,
        }
    }

    // ---- Types ----

    fn type_of(&self, file: FileId, expr: Node<'m>, prefer: Prefer, depth: usize) -> Ty<'m> {
        if depth > MAX_TYPE_DEPTH {
            return Ty::Unknown;
        }
        match expr.kind() {
            "this" => self
                .enclosing_class(file, expr)
                .map(Ty::Instance)
                .unwrap_or(Ty::Unknown),
            "super" => self
                .enclosing_class(file, expr)
                .and_then(|class| self.base_class(class, depth + 1))
                .map(Ty::Instance)
                .unwrap_or(Ty::Unknown),
            "identifier" | "member_expression" | "subscript_expression" => {
                match self.expression_symbol_at(file, expr, depth) {
                    Some(symbol) => self.symbol_type(symbol, prefer, depth + 1),
                    None => Ty::Unknown,
                }
            }
            "call_expression" => {
                let callee = expr
                    .child_by_field_name("function")
                    .and_then(|f| self.expression_symbol_at(file, f, depth));
                match callee {
                    Some(Symbol::Decl(id)) => self.return_type(id, depth + 1),
                    _ => Ty::Unknown,
                }
            }
            "new_expression" => {
                let constructed = expr
                    .child_by_field_name("constructor")
                    .map(|c| self.type_of(file, c, prefer, depth));
                match constructed {
                    Some(Ty::Static(class)) => Ty::Instance(class),
                    _ => Ty::Unknown,
                }
            }
            "parenthesized_expression" | "non_null_expression" | "satisfies_expression"
            | "await_expression" => match syntax::first_named_child(expr) {
                Some(inner) => self.type_of(file, inner, prefer, depth),
                None => Ty::Unknown,
            },
            "as_expression" => {
                let children = syntax::named_children(expr);
                let asserted = children
                    .get(1)
                    .map(|t| self.type_from_annotation(file, *t, depth))
                    .unwrap_or(Ty::Unknown);
                match (prefer, asserted, children.first()) {
                    (Prefer::Annotation, ty, _) if !ty.is_unknown() => ty,
                    (_, _, Some(inner)) => self.type_of(file, *inner, prefer, depth),
                    _ => asserted,
                }
            }
            "object" => Ty::Object(file, expr),
            _ => Ty::Unknown,
        }
    }

    fn symbol_type(&self, symbol: Symbol<'m>, prefer: Prefer, depth: usize) -> Ty<'m> {
        match symbol {
            Symbol::Module(file) => Ty::Module(file),
            Symbol::Import(_) => match self.resolve_alias(symbol) {
                Some(Symbol::Import(_)) | None => Ty::Unknown,
                Some(resolved) => self.symbol_type(resolved, prefer, depth + 1),
            },
            Symbol::Decl(id) => {
                let decl = self.decl(id);
                match decl.kind {
                    DeclKind::Class => Ty::Static(id),
                    DeclKind::Variable | DeclKind::Property => {
                        self.binding_type(decl.file, decl.node, prefer, depth)
                    }
                    DeclKind::Accessor => self.return_type(id, depth),
                    _ => Ty::Unknown,
                }
            }
            Symbol::Local(file, node) => self.binding_type(file, node, prefer, depth),
        }
    }

    /// Type of a declarator, field or parameter node.
    fn binding_type(&self, file: FileId, node: Node<'m>, prefer: Prefer, depth: usize) -> Ty<'m> {
        if depth > MAX_TYPE_DEPTH {
            return Ty::Unknown;
        }
        let annotated = || {
            node.child_by_field_name("type")
                .map(|t| self.type_from_annotation(file, t, depth + 1))
                .unwrap_or(Ty::Unknown)
        };
        let initialized = || {
            node.child_by_field_name("value")
                .map(|v| self.type_of(file, v, prefer, depth + 1))
                .unwrap_or(Ty::Unknown)
        };
        match prefer {
            Prefer::Annotation => {
                let ty = annotated();
                if ty.is_unknown() {
                    initialized()
                } else {
                    ty
                }
            }
            Prefer::Initializer => {
                let ty = initialized();
                if ty.is_unknown() {
                    annotated()
                } else {
                    ty
                }
            }
        }
    }

    /// Declared return type of a function, method, accessor or function-valued binding.
    pub fn return_type(&self, id: DeclId, depth: usize) -> Ty<'m> {
        let decl = self.decl(id);
        decl.function_node()
            .and_then(|f| f.child_by_field_name("return_type"))
            .map(|t| self.type_from_annotation(decl.file, t, depth + 1))
            .unwrap_or(Ty::Unknown)
    }

    /// Instance type named by a type annotation.
    pub fn type_from_annotation(&self, file: FileId, node: Node<'m>, depth: usize) -> Ty<'m> {
        if depth > MAX_TYPE_DEPTH {
            return Ty::Unknown;
        }
        let Some(node) = syntax::annotation_type(node) else {
            return Ty::Unknown;
        };
        match node.kind() {
            "type_identifier" | "identifier" => {
                let name = self.text(file, node);
                self.lookup_name(file, node, name)
                    .and_then(|s| self.resolve_alias(s))
                    .map(|s| self.instance_of(s))
                    .unwrap_or(Ty::Unknown)
            }
            "generic_type" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return Ty::Unknown;
                };
                let type_name = self.text(file, name);
                if PROMISE_TYPES.iter().any(|p| *p == type_name) {
                    return node
                        .child_by_field_name("type_arguments")
                        .and_then(syntax::first_named_child)
                        .map(|arg| self.type_from_annotation(file, arg, depth + 1))
                        .unwrap_or(Ty::Unknown);
                }
                self.type_from_annotation(file, name, depth + 1)
            }
            "nested_type_identifier" => {
                let module = node.child_by_field_name("module");
                let name = node.child_by_field_name("name");
                let (Some(module), Some(name)) = (module, name) else {
                    return Ty::Unknown;
                };
                if module.kind() != "identifier" {
                    return Ty::Unknown;
                }
                match self
                    .resolve_identifier(file, module)
                    .and_then(|s| self.resolve_alias(s))
                {
                    Some(Symbol::Module(target)) => self
                        .export_symbol(target, self.text(file, name))
                        .and_then(|s| self.resolve_alias(s))
                        .map(|s| self.instance_of(s))
                        .unwrap_or(Ty::Unknown),
                    _ => Ty::Unknown,
                }
            }
            "union_type" => {
                let members: Vec<Node<'m>> = union_members(node)
                    .into_iter()
                    .filter(|m| !matches!(self.text(file, *m).trim(), "null" | "undefined" | "void"))
                    .collect();
                match members.as_slice() {
                    [only] => self.type_from_annotation(file, *only, depth + 1),
                    _ => Ty::Unknown,
                }
            }
            "parenthesized_type" | "readonly_type" => match syntax::first_named_child(node) {
                Some(inner) => self.type_from_annotation(file, inner, depth + 1),
                None => Ty::Unknown,
            },
            _ => Ty::Unknown,
        }
    }

    fn instance_of(&self, symbol: Symbol<'m>) -> Ty<'m> {
        match symbol {
            Symbol::Decl(id) if self.decl(id).kind == DeclKind::Class => Ty::Instance(id),
            _ => Ty::Unknown,
        }
    }

    // ---- Members ----

    /// Look `name` up on a receiver type.
    fn lookup_member_at(&self, receiver: Ty<'m>, name: &str, depth: usize) -> Option<Symbol<'m>> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        match receiver {
            Ty::Instance(class) => self.class_member_at(class, name, false, depth).map(Symbol::Decl),
            Ty::Static(class) => self.class_member_at(class, name, true, depth).map(Symbol::Decl),
            Ty::Module(file) => self.export_symbol(file, name),
            Ty::Object(file, object) => self.object_member(file, object, name, depth),
            Ty::Unknown => None,
        }
    }

    /// A class member by name, searching the `extends` chain.
    fn class_member_at(
        &self,
        class: DeclId,
        name: &str,
        is_static: bool,
        depth: usize,
    ) -> Option<DeclId> {
        let mut current = Some(class);
        let mut visited = FxHashSet::default();
        while let Some(class) = current {
            if !visited.insert(class) || visited.len() > MAX_TYPE_DEPTH {
                return None;
            }
            let found = self.symbols().members(class).iter().copied().find(|m| {
                let member = self.decl(*m);
                member.name == name && member.is_static == is_static
            });
            if found.is_some() {
                return found;
            }
            current = self.base_class(class, depth + 1);
        }
        None
    }

    fn object_member(
        &self,
        file: FileId,
        object: Node<'m>,
        name: &str,
        depth: usize,
    ) -> Option<Symbol<'m>> {
        let source = &self.file(file).source;
        for entry in syntax::named_children(object) {
            match entry.kind() {
                "pair" => {
                    let key = entry
                        .child_by_field_name("key")
                        .and_then(|k| syntax::member_name(k, source));
                    if key.as_deref() != Some(name) {
                        continue;
                    }
                    let value = entry.child_by_field_name("value")?;
                    return self.expression_symbol_at(file, value, depth + 1);
                }
                "shorthand_property_identifier" if syntax::text(entry, source) == name => {
                    return self
                        .lookup_name(file, entry, name)
                        .and_then(|s| self.resolve_alias(s));
                }
                _ => {}
            }
        }
        None
    }

    /// The class a class declaration extends, when it resolves to one.
    pub fn base_class(&self, class: DeclId, depth: usize) -> Option<DeclId> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        let decl = self.decl(class);
        let heritage = syntax::named_children(decl.node)
            .into_iter()
            .find(|c| c.kind() == "class_heritage")?;
        let base = syntax::named_children(heritage).into_iter().find_map(|clause| {
            match clause.kind() {
                "extends_clause" => clause.child_by_field_name("value"),
                "implements_clause" => None,
                // JavaScript grammar: `class_heritage` holds the expression directly.
                _ => Some(clause),
            }
        })?;
        match self.expression_symbol_at(decl.file, base, depth + 1)? {
            Symbol::Decl(id) if self.decl(id).kind == DeclKind::Class && id != class => Some(id),
            _ => None,
        }
    }

    /// The class whose body lexically contains `node`, seen through arrow
    /// functions but not through `function` boundaries.
    pub fn enclosing_class(&self, file: FileId, node: Node<'m>) -> Option<DeclId> {
        let mut current = node.parent();
        while let Some(n) = current {
            match n.kind() {
                "class_body" => {
                    let class = n.parent()?;
                    return self
                        .symbols()
                        .decl_at(file, class)
                        .filter(|id| self.decl(*id).kind == DeclKind::Class);
                }
                "function_declaration"
                | "function_expression"
                | "function"
                | "generator_function_declaration"
                | "generator_function" => return None,
                "method_definition" if n.parent().map(|p| p.kind()) == Some("object") => {
                    return None;
                }
                _ => {}
            }
            current = n.parent();
        }
        None
    }

    // ---- Classes as values ----

    /// Resolve a class reference as written in decorator metadata or an
    /// injection token: `X`, `ns.X`, `forwardRef(() => X)`, `X.forRoot()`,
    /// `{ provide, useClass: X }`.
    pub fn resolve_class_reference(&self, file: FileId, expr: Node<'m>) -> Option<DeclId> {
        self.class_reference_at(file, expr, 0)
    }

    fn class_reference_at(&self, file: FileId, expr: Node<'m>, depth: usize) -> Option<DeclId> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        let expr = syntax::unwrap_expression(expr);
        match expr.kind() {
            "call_expression" => {
                let callee = syntax::unwrap_expression(expr.child_by_field_name("function")?);
                let callee_name = match callee.kind() {
                    "identifier" => Some(self.text(file, callee)),
                    "member_expression" => callee
                        .child_by_field_name("property")
                        .map(|p| self.text(file, p)),
                    _ => None,
                };
                if callee_name == Some("forwardRef") {
                    let arg = expr
                        .child_by_field_name("arguments")
                        .and_then(syntax::first_named_child)?;
                    let target = match arg.kind() {
                        "arrow_function" => arrow_result(arg)?,
                        _ => arg,
                    };
                    return self.class_reference_at(file, target, depth + 1);
                }
                if callee.kind() == "member_expression" {
                    let object = callee.child_by_field_name("object")?;
                    return self.class_reference_at(file, object, depth + 1);
                }
                None
            }
            "object" => {
                let source = &self.file(file).source;
                let mut provide = None;
                for entry in syntax::named_children(expr) {
                    if entry.kind() != "pair" {
                        continue;
                    }
                    let key = entry
                        .child_by_field_name("key")
                        .and_then(|k| syntax::member_name(k, source));
                    let value = entry.child_by_field_name("value");
                    match (key.as_deref(), value) {
                        (Some("useClass" | "useExisting"), Some(value)) => {
                            if let Some(id) = self.class_reference_at(file, value, depth + 1) {
                                return Some(id);
                            }
                        }
                        (Some("provide"), Some(value)) => provide = Some(value),
                        _ => {}
                    }
                }
                provide.and_then(|p| self.class_reference_at(file, p, depth + 1))
            }
            _ => match self.expression_symbol_at(file, expr, depth + 1)? {
                Symbol::Decl(id) if self.decl(id).kind == DeclKind::Class => Some(id),
                _ => None,
            },
        }
    }
}

/// Binding for `name` declared directly inside a block-like scope node.
fn block_binding<'m>(scope: Node<'m>, name: &str, source: &str) -> Option<Node<'m>> {
    match scope.kind() {
        "statement_block" | "switch_case" | "switch_default" | "class_static_block" => {
            syntax::named_children(scope)
                .into_iter()
                .find_map(|stmt| statement_binding(stmt, name, source))
        }
        "for_statement" => scope
            .child_by_field_name("initializer")
            .and_then(|init| statement_binding(init, name, source)),
        "for_in_statement" => scope
            .child_by_field_name("left")
            .and_then(|left| syntax::pattern_binding(left, name, source)),
        "catch_clause" => scope
            .child_by_field_name("parameter")
            .and_then(|p| syntax::pattern_binding(p, name, source)),
        _ => None,
    }
}

fn statement_binding<'m>(stmt: Node<'m>, name: &str, source: &str) -> Option<Node<'m>> {
    match stmt.kind() {
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            let own = stmt.child_by_field_name("name")?;
            (syntax::text(own, source) == name).then_some(stmt)
        }
        "lexical_declaration" | "variable_declaration" => {
            syntax::named_children(stmt).into_iter().find_map(|declarator| {
                let pattern = declarator.child_by_field_name("name")?;
                let ident = syntax::pattern_binding(pattern, name, source)?;
                Some(if ident == pattern { declarator } else { ident })
            })
        }
        _ => None,
    }
}

/// Members of a union type, flattening nested unions.
fn union_members(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    for member in syntax::named_children(node) {
        if member.kind() == "union_type" {
            out.extend(union_members(member));
        } else {
            out.push(member);
        }
    }
    out
}

/// The value an arrow function evaluates to: its expression body, or the
/// argument of a lone `return`.
fn arrow_result(arrow: Node<'_>) -> Option<Node<'_>> {
    let body = arrow.child_by_field_name("body")?;
    if body.kind() != "statement_block" {
        return Some(body);
    }
    syntax::named_children(body)
        .into_iter()
        .find(|s| s.kind() == "return_statement")
        .and_then(syntax::first_named_child)
}
