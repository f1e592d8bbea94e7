//! Function signature extraction for the API-preservation check.
//!
//! Walks every `function_definition` node in a tree, nested and method
//! definitions included, and records positional parameter names in
//! declaration order as a canonical `name(p1, p2)` string. Keyword-only and
//! variadic parameters are not captured, and default-value or annotation
//! markers are not distinguished; the comparison is deliberately coarse.

use patchgate_syntax::{ParseResult, parse_python};

use crate::tree::node_text;

/// Tracing target for signature extraction.
const SIGNATURE_TARGET: &str = "patchgate_analysis::signatures";

/// An insertion-ordered map from function name to canonical signature.
///
/// Duplicate names (redefinition, nested shadowing) overwrite in place:
/// last write wins, first insertion keeps its position. Iteration order is
/// therefore the traversal order in which names were first seen, which keeps
/// validator output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureMap {
    entries: Vec<(String, String)>,
}

impl SignatureMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces a signature, keeping first-insertion order.
    pub fn insert(&mut self, name: String, signature: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = signature;
        } else {
            self.entries.push((name, signature));
        }
    }

    /// Looks up a signature by function name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, signature)| signature.as_str())
    }

    /// Iterates entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, signature)| (name.as_str(), signature.as_str()))
    }

    /// Returns the number of distinct function names recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no functions were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts signatures from an already-parsed artifact.
#[must_use]
pub fn extract_signatures(parsed: &ParseResult) -> SignatureMap {
    let mut map = SignatureMap::new();
    collect(parsed.root_node(), parsed.source(), &mut map);
    map
}

/// Parses source text and extracts signatures.
///
/// Source that does not parse yields an empty map rather than an error: the
/// validator treats that as "no functions known". The fallback is logged so
/// the masking effect is at least visible.
#[must_use]
pub fn extract_signatures_from_source(source: &str) -> SignatureMap {
    match parse_python(source) {
        Ok(parsed) => extract_signatures(&parsed),
        Err(failure) => {
            tracing::warn!(
                target: SIGNATURE_TARGET,
                line = failure.line,
                "signature extraction skipped, source does not parse"
            );
            SignatureMap::new()
        }
    }
}

fn collect(node: tree_sitter::Node<'_>, source: &str, map: &mut SignatureMap) {
    if node.kind() == "function_definition"
        && let Some(name) = node
            .child_by_field_name("name")
            .and_then(|n| node_text(n, source))
    {
        let params = node
            .child_by_field_name("parameters")
            .map(|p| positional_parameters(p, source))
            .unwrap_or_default();
        map.insert(name.to_owned(), format!("{name}({})", params.join(", ")));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, map);
    }
}

/// Collects positional parameter names in declaration order.
///
/// Plain, annotated, and defaulted parameters all contribute their bare
/// name. Collection stops at the first `*args` or keyword-only marker, so
/// keyword-only and `**kwargs` parameters never appear. The positional-only
/// `/` marker is skipped without ending collection.
fn positional_parameters(params: tree_sitter::Node<'_>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let name = match child.kind() {
            "identifier" => node_text(child, source),
            "typed_parameter" => child
                .named_child(0)
                .filter(|n| n.kind() == "identifier")
                .and_then(|n| node_text(n, source)),
            "default_parameter" | "typed_default_parameter" => child
                .child_by_field_name("name")
                .and_then(|n| node_text(n, source)),
            "positional_separator" => continue,
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => None,
        };
        if let Some(name) = name {
            names.push(name.to_owned());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("def f(a, b):\n    return a + b\n", "f", "f(a, b)")]
    #[case("def g():\n    pass\n", "g", "g()")]
    #[case("def h(x, y=1):\n    pass\n", "h", "h(x, y)")]
    #[case("def i(x: int, y: str = 'a'):\n    pass\n", "i", "i(x, y)")]
    fn extracts_canonical_signature(
        #[case] source: &str,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        let map = extract_signatures_from_source(source);
        assert_eq!(map.get(name), Some(expected));
    }

    #[test]
    fn variadic_and_keyword_only_parameters_are_dropped() {
        let map = extract_signatures_from_source("def f(a, b, *args, c=1, **kwargs):\n    pass\n");
        assert_eq!(map.get("f"), Some("f(a, b)"));
    }

    #[test]
    fn nested_and_method_definitions_are_visited() {
        let source = "\
class Widget:
    def render(self, depth):
        def helper(n):
            return n
        return helper(depth)
";
        let map = extract_signatures_from_source(source);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("render"), Some("render(self, depth)"));
        assert_eq!(map.get("helper"), Some("helper(n)"));
    }

    #[test]
    fn redefinition_is_last_write_wins() {
        let source = "def f(a):\n    pass\n\ndef f(a, b):\n    pass\n";
        let map = extract_signatures_from_source(source);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("f"), Some("f(a, b)"));
    }

    #[test]
    fn overwrite_keeps_first_insertion_position() {
        let source = "def f(a):\n    pass\n\ndef g(x):\n    pass\n\ndef f(b):\n    pass\n";
        let map = extract_signatures_from_source(source);

        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["f", "g"]);
        assert_eq!(map.get("f"), Some("f(b)"));
    }

    #[test]
    fn unparsable_source_yields_empty_map() {
        let map = extract_signatures_from_source("def broken(\n");
        assert!(map.is_empty());
    }

    #[test]
    fn source_without_functions_yields_empty_map() {
        let map = extract_signatures_from_source("x = 1\n");
        assert!(map.is_empty());
    }
}
