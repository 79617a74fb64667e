//! Shared tree-sitter utilities for language support modules.
//!
//! Provides common functions for extracting text and positions from tree-sitter nodes.

// Tree-sitter returns usize for positions, but we store u32 for compactness.
// This is safe for practical source files (no file has 4 billion lines).
#![allow(clippy::cast_possible_truncation)]

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
pub fn node_text(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// 1-indexed line on which a node starts.
pub fn node_line(node: &tree_sitter::Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Text of a string literal node with its quotes removed.
///
/// Template literals and escape sequences are returned verbatim between the
/// delimiters; module specifiers never need unescaping in practice.
pub fn string_literal_value(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    let raw = node_text(node, content)?;
    let trimmed = raw
        .strip_prefix(['\'', '"', '`'])
        .and_then(|s| s.strip_suffix(['\'', '"', '`']))
        .unwrap_or(&raw);
    Some(trimmed.to_string())
}
