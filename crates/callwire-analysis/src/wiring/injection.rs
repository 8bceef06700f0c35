//! Constructor-parameter injection.

use callwire_core::config::ConventionsConfig;
use tree_sitter::Node;

use crate::model::{syntax, DeclId, Program, Ty};

/// The first constructor implementation in a class body.
///
/// Overload signatures (`constructor(a: A);`) have no body and are skipped;
/// the implementation carries the parameters that get injected.
pub fn first_constructor<'m>(class_node: Node<'m>, source: &str) -> Option<Node<'m>> {
    let body = class_node.child_by_field_name("body")?;
    syntax::named_children(body).into_iter().find(|member| {
        member.kind() == "method_definition"
            && member
                .child_by_field_name("name")
                .is_some_and(|n| syntax::text(n, source) == "constructor")
    })
}

/// Classes injected into `class` through its first constructor, in parameter order.
///
/// A parameter with an injection-token decorator is resolved through the
/// token only; otherwise its declared type is used. Parameters that resolve
/// to no class are skipped.
pub fn constructor_dependencies(
    program: &Program<'_>,
    class: DeclId,
    conventions: &ConventionsConfig,
) -> Vec<DeclId> {
    let decl = program.decl(class);
    let file = decl.file;
    let source = &program.file(file).source;
    let Some(constructor) = first_constructor(decl.node, source) else {
        return Vec::new();
    };
    let inject_decorators = conventions.effective_inject_decorators();

    let mut dependencies = Vec::new();
    for param in syntax::parameters(constructor) {
        let token = syntax::decorators(param).into_iter().find(|d| {
            syntax::decorator_name(*d, source).is_some_and(|n| inject_decorators.contains(&n))
        });
        let dependency = match token {
            Some(decorator) => syntax::decorator_arguments(decorator)
                .into_iter()
                .next()
                .and_then(|arg| program.resolve_class_reference(file, arg)),
            None => param
                .child_by_field_name("type")
                .and_then(|t| match program.type_from_annotation(file, t, 0) {
                    Ty::Instance(id) => Some(id),
                    _ => None,
                }),
        };
        if let Some(dependency) = dependency {
            dependencies.push(dependency);
        }
    }
    dependencies
}
