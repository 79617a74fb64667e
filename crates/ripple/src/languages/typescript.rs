//! TypeScript and JavaScript support for Ripple.
//!
//! Implements declaration and import extraction using tree-sitter-typescript.
//! JavaScript is parsed with the TypeScript grammar (a superset), and JSX
//! files with the TSX grammar.

use std::collections::{BTreeSet, HashSet};

use super::common::{ExtractedDeclaration, ExtractedImport};
use super::tree_sitter_utils::{node_line, node_text, string_literal_value};
use super::LanguageSupport;
use crate::types::SymbolKind;

/// Tree-sitter node kind constants for the TypeScript grammar.
///
/// These match the node types defined in tree-sitter-typescript. Using constants
/// prevents typos and makes supported node types explicit.
mod node_kinds {
    // Declarations
    pub const FUNCTION_DECLARATION: &str = "function_declaration";
    pub const GENERATOR_FUNCTION_DECLARATION: &str = "generator_function_declaration";
    pub const FUNCTION_SIGNATURE: &str = "function_signature";
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const ABSTRACT_CLASS_DECLARATION: &str = "abstract_class_declaration";
    pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const AMBIENT_DECLARATION: &str = "ambient_declaration";

    // Default-export expressions
    pub const FUNCTION_EXPRESSION: &str = "function_expression";
    pub const FUNCTION: &str = "function";
    pub const GENERATOR_FUNCTION: &str = "generator_function";
    pub const CLASS: &str = "class";

    // Export nodes
    pub const EXPORT_STATEMENT: &str = "export_statement";
    pub const EXPORT_CLAUSE: &str = "export_clause";
    pub const EXPORT_SPECIFIER: &str = "export_specifier";
    pub const DEFAULT: &str = "default";

    // Import nodes
    pub const IMPORT_STATEMENT: &str = "import_statement";
    pub const IMPORT_CLAUSE: &str = "import_clause";
    pub const IMPORT_SPECIFIER: &str = "import_specifier";
    pub const NAMED_IMPORTS: &str = "named_imports";
    pub const NAMESPACE_IMPORT: &str = "namespace_import";
    pub const IDENTIFIER: &str = "identifier";

    // Identifier tokens counted as references
    pub const REFERENCE_TOKENS: &[&str] = &[
        "identifier",
        "property_identifier",
        "type_identifier",
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
        "statement_identifier",
    ];
}

/// Name given to unnamed default-exported functions and classes.
pub const ANONYMOUS: &str = "anonymous";

/// Plain TypeScript/JavaScript grammar.
pub struct TypeScriptLanguage;

impl LanguageSupport for TypeScriptLanguage {
    fn extensions(&self) -> &[&str] {
        &["ts", "mts", "cts", "js", "mjs", "cjs"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }
}

/// TSX grammar, used for any file that may contain JSX.
pub struct TsxLanguage;

impl LanguageSupport for TsxLanguage {
    fn extensions(&self) -> &[&str] {
        &["tsx", "jsx"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Extract every top-level declaration, marking the exported ones.
///
/// A declaration counts as exported when it is written as `export <decl>`,
/// `export default <decl>`, or when a local `export { name }` clause in the
/// same file names it. Declarations are returned in source order.
pub fn extract_declarations(
    tree: &tree_sitter::Tree,
    content: &[u8],
) -> Vec<ExtractedDeclaration> {
    use node_kinds::EXPORT_STATEMENT;

    let root = tree.root_node();
    let mut declarations = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == EXPORT_STATEMENT {
            collect_export_statement(&child, content, &mut declarations);
        } else {
            collect_declaration(&child, &child, content, false, &mut declarations);
        }
    }

    let clause_exports = collect_local_export_names(&root, content);
    if !clause_exports.is_empty() {
        for decl in &mut declarations {
            if clause_exports.contains(decl.name.as_str()) {
                decl.exported = true;
            }
        }
    }

    declarations
}

/// Exported declarations grouped by kind: functions, classes, variables,
/// interfaces, types, enums. Source order is kept within each kind.
#[must_use]
pub fn exported_in_kind_order(declarations: &[ExtractedDeclaration]) -> Vec<ExtractedDeclaration> {
    let mut exported: Vec<ExtractedDeclaration> =
        declarations.iter().filter(|d| d.exported).cloned().collect();
    // Stable sort keeps source order inside each kind.
    exported.sort_by_key(|d| d.kind);
    exported
}

/// Handle one `export ...` statement.
fn collect_export_statement(
    node: &tree_sitter::Node,
    content: &[u8],
    out: &mut Vec<ExtractedDeclaration>,
) {
    use node_kinds::{
        CLASS, DEFAULT, FUNCTION, FUNCTION_EXPRESSION, GENERATOR_FUNCTION,
    };

    // `export { x } from './y'` and `export * from './y'` re-export; they declare nothing here.
    if node.child_by_field_name("source").is_some() {
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        collect_declaration(&decl, node, content, true, out);
        return;
    }

    let is_default = {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == DEFAULT)
    };
    if !is_default {
        return;
    }

    let Some(value) = node.child_by_field_name("value") else {
        return;
    };
    let kind = match value.kind() {
        FUNCTION_EXPRESSION | FUNCTION | GENERATOR_FUNCTION => SymbolKind::Function,
        CLASS => SymbolKind::Class,
        // `export default <expression>` is an export assignment, not a declaration.
        _ => return,
    };
    let name = value
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, content))
        .unwrap_or_else(|| ANONYMOUS.to_string());

    out.push(ExtractedDeclaration {
        name,
        kind,
        line: node_line(node),
        exported: true,
        references: collect_references(&value, content),
    });
}

/// Record a declaration node.
///
/// `outer` is the node whose start line is reported: the wrapping
/// `export_statement` for exported declarations, otherwise the node itself.
fn collect_declaration(
    node: &tree_sitter::Node,
    outer: &tree_sitter::Node,
    content: &[u8],
    exported: bool,
    out: &mut Vec<ExtractedDeclaration>,
) {
    use node_kinds::{
        ABSTRACT_CLASS_DECLARATION, AMBIENT_DECLARATION, CLASS_DECLARATION, ENUM_DECLARATION,
        FUNCTION_DECLARATION, FUNCTION_SIGNATURE, GENERATOR_FUNCTION_DECLARATION,
        INTERFACE_DECLARATION, LEXICAL_DECLARATION, TYPE_ALIAS_DECLARATION,
        VARIABLE_DECLARATION, VARIABLE_DECLARATOR,
    };

    let kind = match node.kind() {
        FUNCTION_DECLARATION | GENERATOR_FUNCTION_DECLARATION => SymbolKind::Function,
        CLASS_DECLARATION | ABSTRACT_CLASS_DECLARATION => SymbolKind::Class,
        INTERFACE_DECLARATION => SymbolKind::Interface,
        TYPE_ALIAS_DECLARATION => SymbolKind::Type,
        ENUM_DECLARATION => SymbolKind::Enum,
        LEXICAL_DECLARATION | VARIABLE_DECLARATION => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != VARIABLE_DECLARATOR {
                    continue;
                }
                let Some(name) = declarator
                    .child_by_field_name("name")
                    .and_then(|n| node_text(&n, content))
                else {
                    continue;
                };
                out.push(ExtractedDeclaration {
                    name,
                    kind: SymbolKind::Variable,
                    line: node_line(&declarator),
                    exported,
                    references: collect_references(&declarator, content),
                });
            }
            return;
        }
        AMBIENT_DECLARATION => {
            // `declare function f(): void;` uses a bodiless signature node.
            let mut cursor = node.walk();
            for inner in node.named_children(&mut cursor) {
                if inner.kind() == FUNCTION_SIGNATURE {
                    push_named(&inner, outer, content, SymbolKind::Function, exported, out);
                } else {
                    collect_declaration(&inner, outer, content, exported, out);
                }
            }
            return;
        }
        _ => return,
    };

    push_named(node, outer, content, kind, exported, out);
}

/// Push a declaration whose name lives in its `name` field.
fn push_named(
    node: &tree_sitter::Node,
    outer: &tree_sitter::Node,
    content: &[u8],
    kind: SymbolKind,
    exported: bool,
    out: &mut Vec<ExtractedDeclaration>,
) {
    let Some(name) = node
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, content))
    else {
        return;
    };

    let references = if kind.tracks_references() {
        collect_references(node, content)
    } else {
        BTreeSet::new()
    };

    out.push(ExtractedDeclaration {
        name,
        kind,
        line: node_line(outer),
        exported,
        references,
    });
}

/// Names exported through local `export { a, b as c }` clauses.
///
/// Returns the *local* names (`a`, `b`), which is what declarations are keyed by.
fn collect_local_export_names(
    root: &tree_sitter::Node,
    content: &[u8],
) -> HashSet<String> {
    use node_kinds::{EXPORT_CLAUSE, EXPORT_SPECIFIER, EXPORT_STATEMENT};

    let mut names = HashSet::new();
    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        if stmt.kind() != EXPORT_STATEMENT || stmt.child_by_field_name("source").is_some() {
            continue;
        }
        let mut stmt_cursor = stmt.walk();
        for clause in stmt.named_children(&mut stmt_cursor) {
            if clause.kind() != EXPORT_CLAUSE {
                continue;
            }
            let mut clause_cursor = clause.walk();
            for spec in clause.named_children(&mut clause_cursor) {
                if spec.kind() != EXPORT_SPECIFIER {
                    continue;
                }
                if let Some(name) = spec
                    .child_by_field_name("name")
                    .and_then(|n| node_text(&n, content))
                {
                    names.insert(name);
                }
            }
        }
    }
    names
}

// ============================================================================
// References
// ============================================================================

/// Collect the identifier tokens inside `node`, skipping anything that belongs
/// to an import statement or import specifier.
fn collect_references(node: &tree_sitter::Node, content: &[u8]) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect_references_recursive(node, content, &mut refs);
    refs
}

fn collect_references_recursive(
    node: &tree_sitter::Node,
    content: &[u8],
    refs: &mut BTreeSet<String>,
) {
    use node_kinds::{IMPORT_SPECIFIER, IMPORT_STATEMENT, REFERENCE_TOKENS};

    match node.kind() {
        IMPORT_STATEMENT | IMPORT_SPECIFIER => return,
        kind if REFERENCE_TOKENS.contains(&kind) => {
            if let Some(text) = node_text(node, content) {
                refs.insert(text);
            }
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_references_recursive(&child, content, refs);
    }
}

// ============================================================================
// Imports
// ============================================================================

/// Extract top-level `import ... from '...'` statements.
///
/// `import x = require('...')` has no `source` field on the statement and is
/// not treated as an import.
pub fn extract_imports(tree: &tree_sitter::Tree, content: &[u8]) -> Vec<ExtractedImport> {
    use node_kinds::IMPORT_STATEMENT;

    let root = tree.root_node();
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != IMPORT_STATEMENT {
            continue;
        }
        if let Some(import) = parse_import_statement(&child, content) {
            imports.push(import);
        }
    }

    imports
}

fn parse_import_statement(node: &tree_sitter::Node, content: &[u8]) -> Option<ExtractedImport> {
    use node_kinds::IMPORT_CLAUSE;

    let source = node.child_by_field_name("source")?;
    let specifier = string_literal_value(&source, content)?;

    let mut imported_names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == IMPORT_CLAUSE {
            imported_names = collect_import_clause_names(&child, content);
            break;
        }
    }

    Some(ExtractedImport {
        imported_names,
        specifier,
        line: node_line(node),
    })
}

/// Bound names of an import clause: named bindings in order, then the default
/// binding, then `* as <name>`.
fn collect_import_clause_names(clause: &tree_sitter::Node, content: &[u8]) -> Vec<String> {
    use node_kinds::{IDENTIFIER, IMPORT_SPECIFIER, NAMED_IMPORTS, NAMESPACE_IMPORT};

    let mut named = Vec::new();
    let mut default_binding = None;
    let mut namespace = None;

    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            IDENTIFIER => default_binding = node_text(&child, content),
            NAMED_IMPORTS => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != IMPORT_SPECIFIER {
                        continue;
                    }
                    // The `name` field is the exported name; an alias is not recorded.
                    if let Some(name) = spec
                        .child_by_field_name("name")
                        .and_then(|n| string_literal_value(&n, content))
                    {
                        named.push(name);
                    }
                }
            }
            NAMESPACE_IMPORT => {
                let mut inner = child.walk();
                namespace = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == IDENTIFIER)
                    .and_then(|n| node_text(&n, content));
            }
            _ => {}
        }
    }

    named.extend(default_binding);
    named.extend(namespace.map(|ns| format!("* as {ns}")));
    named
}
