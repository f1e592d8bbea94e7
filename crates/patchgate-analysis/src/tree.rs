//! Small helpers for reading Tree-sitter nodes.

/// Returns the source text spanned by a node, if its byte range is valid.
pub(crate) fn node_text<'s>(node: tree_sitter::Node<'_>, source: &'s str) -> Option<&'s str> {
    source.get(node.byte_range())
}

/// Returns the one-based line on which a node starts.
pub(crate) fn node_line(node: tree_sitter::Node<'_>) -> u32 {
    u32::try_from(node.start_position().row.saturating_add(1)).unwrap_or(u32::MAX)
}
