//! Error-tolerant parsing: locate ERROR and MISSING nodes in a recovered tree.

use tree_sitter::Node;

use super::types::Range;

/// Count ERROR/MISSING nodes in a tree-sitter tree.
pub fn count_errors(root: Node) -> (u32, Vec<Range>) {
    let mut count = 0u32;
    let mut ranges = Vec::new();
    if !root.has_error() {
        return (count, ranges);
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
            ranges.push(Range::from_ts_node(&node));
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    ranges.sort_by_key(|r| (r.start.line, r.start.column));
    (count, ranges)
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

    #[test]
    fn clean_source_has_no_errors() {
        let tree = parse("function ok(a: number) { return a + 1; }");
        let (count, ranges) = count_errors(tree.root_node());
        assert_eq!(count, 0);
        assert!(ranges.is_empty());
    }

    #[test]
    fn broken_source_reports_errors() {
        let tree = parse("function broken( { return ; ");
        let (count, ranges) = count_errors(tree.root_node());
        assert!(count > 0);
        assert_eq!(ranges.len(), count as usize);
    }

    #[test]
    fn ranges_are_sorted_by_position() {
        let tree = parse("const a = ;\nconst b = ;\n");
        let (_, ranges) = count_errors(tree.root_node());
        assert!(!ranges.is_empty());
        assert!(ranges
            .windows(2)
            .all(|w| (w[0].start.line, w[0].start.column) <= (w[1].start.line, w[1].start.column)));
        assert_eq!(ranges[0].start.line, 0);
    }
}
