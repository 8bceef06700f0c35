//! Module decorator metadata: `@Module({ imports, controllers, providers, exports })`.

use callwire_core::config::ConventionsConfig;
use tree_sitter::Node;

use crate::model::{syntax, DeclId, DeclKind, FileId, Program, Symbol};

/// Class references read from one module decorator, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMetadata {
    pub imports: Vec<DeclId>,
    pub controllers: Vec<DeclId>,
    /// `providers` and `exports` combined.
    pub providers: Vec<DeclId>,
}

impl ModuleMetadata {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.controllers.is_empty() && self.providers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataKey {
    Imports,
    Controllers,
    Providers,
}

impl MetadataKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "imports" => Some(Self::Imports),
            "controllers" => Some(Self::Controllers),
            "providers" | "exports" => Some(Self::Providers),
            _ => None,
        }
    }
}

/// Read the metadata object of the module decorator on `module`.
///
/// A missing decorator, a non-object argument or an unknown key leaves the
/// affected lists empty.
pub fn read_module_metadata(
    program: &Program<'_>,
    module: DeclId,
    conventions: &ConventionsConfig,
) -> ModuleMetadata {
    let mut metadata = ModuleMetadata::default();
    let decl = program.decl(module);
    let file = decl.file;
    let source = &program.file(file).source;
    let module_decorators = conventions.effective_module_decorators();

    let decorator = syntax::decorators(decl.node).into_iter().find(|d| {
        syntax::decorator_name(*d, source).is_some_and(|name| module_decorators.contains(&name))
    });
    let object = decorator
        .and_then(|d| syntax::decorator_arguments(d).into_iter().next())
        .map(syntax::unwrap_expression)
        .filter(|arg| arg.kind() == "object");
    let Some(object) = object else {
        return metadata;
    };

    for entry in syntax::named_children(object) {
        let (key, values) = match entry.kind() {
            "pair" => {
                let key = entry
                    .child_by_field_name("key")
                    .and_then(|k| syntax::member_name(k, source))
                    .and_then(|k| MetadataKey::parse(&k));
                let value = entry.child_by_field_name("value");
                match (key, value) {
                    (Some(key), Some(value)) => (key, list_elements(file, value)),
                    _ => continue,
                }
            }
            // `@Module({ providers })` with `const providers = [...]`
            "shorthand_property_identifier" => {
                let Some(key) = MetadataKey::parse(syntax::text(entry, source)) else {
                    continue;
                };
                (key, shorthand_elements(program, file, entry))
            }
            _ => continue,
        };

        let target = match key {
            MetadataKey::Imports => &mut metadata.imports,
            MetadataKey::Controllers => &mut metadata.controllers,
            MetadataKey::Providers => &mut metadata.providers,
        };
        for (element_file, element) in values {
            if let Some(class) = program.resolve_class_reference(element_file, element) {
                if !target.contains(&class) {
                    target.push(class);
                }
            }
        }
    }
    metadata
}

/// Elements of a metadata value: an array (spreads skipped) or a single reference.
fn list_elements<'m>(file: FileId, value: Node<'m>) -> Vec<(FileId, Node<'m>)> {
    let value = syntax::unwrap_expression(value);
    if value.kind() == "array" {
        syntax::named_children(value)
            .into_iter()
            .filter(|e| e.kind() != "spread_element")
            .map(|e| (file, e))
            .collect()
    } else {
        vec![(file, value)]
    }
}

fn shorthand_elements<'m>(
    program: &Program<'m>,
    file: FileId,
    entry: Node<'m>,
) -> Vec<(FileId, Node<'m>)> {
    let name = syntax::text(entry, &program.file(file).source);
    let declarator = match program
        .lookup_name(file, entry, name)
        .and_then(|s| program.resolve_alias(s))
    {
        Some(Symbol::Decl(id)) if program.decl(id).kind == DeclKind::Variable => {
            let decl = program.decl(id);
            Some((decl.file, decl.node))
        }
        Some(Symbol::Local(local_file, node)) if node.kind() == "variable_declarator" => {
            Some((local_file, node))
        }
        _ => None,
    };
    declarator
        .and_then(|(owner, node)| {
            node.child_by_field_name("value")
                .map(|value| list_elements(owner, value))
        })
        .unwrap_or_default()
}
