//! Small helpers over tree-sitter nodes of the TypeScript/JavaScript grammars.

use tree_sitter::Node;

/// Node kinds that introduce a function body.
pub fn is_function_like(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

/// Node kinds that can be the initializer of a function-valued binding.
pub fn is_function_value(kind: &str) -> bool {
    matches!(
        kind,
        "function_expression" | "function" | "generator_function" | "arrow_function"
    )
}

/// Source text of `node`.
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Named children without comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// First named child that is not a comment.
pub fn first_named_child<'t>(node: Node<'t>) -> Option<Node<'t>> {
    named_children(node).into_iter().next()
}

/// Whether `node` has a direct (anonymous or named) child of `kind`.
pub fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

/// `async` modifier on a function-like node.
pub fn is_async(node: Node<'_>) -> bool {
    has_child_kind(node, "async")
}

/// `static` modifier on a class member.
pub fn is_static(node: Node<'_>) -> bool {
    has_child_kind(node, "static")
}

/// Strip one layer of matching quotes or backticks.
pub fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    for quote in ['"', '\'', '`'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Value of a literal usable as a property key: strings, substitution-free
/// template strings and numbers.
pub fn literal_value(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "string" => Some(unquote(text(node, source)).to_string()),
        "template_string" => {
            if has_child_kind(node, "template_substitution") {
                None
            } else {
                Some(unquote(text(node, source)).to_string())
            }
        }
        "number" => Some(text(node, source).to_string()),
        _ => None,
    }
}

/// Name of a class member, object key or import/export name node.
pub fn member_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "property_identifier"
        | "private_property_identifier"
        | "identifier"
        | "type_identifier"
        | "shorthand_property_identifier" => Some(text(node, source).to_string()),
        "string" | "number" | "template_string" => literal_value(node, source),
        "computed_property_name" => {
            first_named_child(node).and_then(|inner| literal_value(inner, source))
        }
        _ => None,
    }
}

/// Strip wrappers that do not change which symbol an expression denotes.
pub fn unwrap_expression(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    loop {
        match current.kind() {
            "parenthesized_expression" | "non_null_expression" | "satisfies_expression" => {
                match first_named_child(current) {
                    Some(inner) => current = inner,
                    None => return current,
                }
            }
            _ => return current,
        }
    }
}

/// Decorator nodes attached to a declaration.
///
/// Class decorators written before `export` hang off the enclosing
/// `export_statement`, so those are included too.
pub fn decorators<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    if let Some(parent) = node.parent() {
        if parent.kind() == "export_statement" {
            let mut cursor = parent.walk();
            found.extend(parent.children(&mut cursor).filter(|c| c.kind() == "decorator"));
        }
    }
    let mut cursor = node.walk();
    found.extend(node.children(&mut cursor).filter(|c| c.kind() == "decorator"));
    found
}

/// The callee name of a decorator: `@Foo`, `@Foo()`, `@ns.Foo()` all yield `Foo`.
pub fn decorator_name<'s>(decorator: Node<'_>, source: &'s str) -> Option<&'s str> {
    let mut expr = first_named_child(decorator)?;
    loop {
        match expr.kind() {
            "identifier" => return Some(text(expr, source)),
            "member_expression" => {
                return expr.child_by_field_name("property").map(|p| text(p, source));
            }
            "call_expression" => expr = expr.child_by_field_name("function")?,
            "parenthesized_expression" => expr = first_named_child(expr)?,
            _ => return None,
        }
    }
}

/// Arguments of a decorator call, empty for `@Foo` without parentheses.
pub fn decorator_arguments<'t>(decorator: Node<'t>) -> Vec<Node<'t>> {
    match first_named_child(decorator) {
        Some(call) if call.kind() == "call_expression" => call
            .child_by_field_name("arguments")
            .map(named_children)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Parameter nodes of a function-like node, in declaration order.
pub fn parameters<'t>(function: Node<'t>) -> Vec<Node<'t>> {
    if let Some(params) = function.child_by_field_name("parameters") {
        return named_children(params);
    }
    // `x => x + 1`
    function
        .child_by_field_name("parameter")
        .map(|p| vec![p])
        .unwrap_or_default()
}

/// The binding pattern of a parameter node.
pub fn parameter_pattern(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "required_parameter" | "optional_parameter" => param.child_by_field_name("pattern"),
        "assignment_pattern" => param.child_by_field_name("left"),
        _ => Some(param),
    }
}

/// Type text of a parameter without the leading colon, empty when untyped.
pub fn parameter_type_text<'s>(param: Node<'_>, source: &'s str) -> &'s str {
    param
        .child_by_field_name("type")
        .and_then(first_named_child)
        .map(|t| text(t, source).trim())
        .unwrap_or("")
}

/// The type node inside a `type_annotation`, or the node itself.
pub fn annotation_type(node: Node<'_>) -> Option<Node<'_>> {
    if node.kind() == "type_annotation" {
        first_named_child(node)
    } else {
        Some(node)
    }
}

/// Whether a binding pattern introduces `name`; returns the identifier node.
pub fn pattern_binding<'t>(pattern: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            (text(pattern, source) == name).then_some(pattern)
        }
        "object_pattern" | "array_pattern" => named_children(pattern)
            .into_iter()
            .find_map(|child| pattern_binding(child, name, source)),
        "pair_pattern" => pattern
            .child_by_field_name("value")
            .and_then(|v| pattern_binding(v, name, source)),
        "assignment_pattern" | "object_assignment_pattern" => pattern
            .child_by_field_name("left")
            .and_then(|l| pattern_binding(l, name, source)),
        "rest_pattern" => first_named_child(pattern).and_then(|p| pattern_binding(p, name, source)),
        _ => None,
    }
}

/// Whether a `variable_declarator` belongs to a `const` declaration.
pub fn is_const_declarator(declarator: Node<'_>) -> bool {
    declarator
        .parent()
        .map(|decl| decl.kind() == "lexical_declaration" && has_child_kind(decl, "const"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    fn find<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|c| find(c, kind))
    }

    #[test]
    fn unquote_strips_one_layer() {
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"imports\""), "imports");
        assert_eq!(unquote("`run`"), "run");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn decorator_name_handles_call_and_member_forms() {
        let src = "@common.Module({}) class A {}\n@Injectable() class B {}\n@Sealed class C {}";
        let tree = parse(src);
        let root = tree.root_node();
        let names: Vec<_> = named_children(root)
            .into_iter()
            .flat_map(decorators)
            .filter_map(|d| decorator_name(d, src))
            .collect();
        assert_eq!(names, vec!["Module", "Injectable", "Sealed"]);
    }

    #[test]
    fn async_arrow_detected() {
        let src = "const f = async () => { await g(); };";
        let tree = parse(src);
        let arrow = find(tree.root_node(), "arrow_function").unwrap();
        assert!(is_async(arrow));
    }

    #[test]
    fn template_with_substitution_is_not_literal() {
        let src = "const a = `x${y}`; const b = `run`;";
        let tree = parse(src);
        let mut literals = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(n) = stack.pop() {
            if n.kind() == "template_string" {
                literals.push(literal_value(n, src));
            }
            let mut cursor = n.walk();
            stack.extend(n.children(&mut cursor));
        }
        assert!(literals.contains(&None));
        assert!(literals.contains(&Some("run".to_string())));
    }

    #[test]
    fn parameter_type_text_strips_colon() {
        let src = "function f(a: Map<string, number>, b) {}";
        let tree = parse(src);
        let func = find(tree.root_node(), "function_declaration").unwrap();
        let params = parameters(func);
        assert_eq!(params.len(), 2);
        assert_eq!(parameter_type_text(params[0], src), "Map<string, number>");
        assert_eq!(parameter_type_text(params[1], src), "");
    }
}
