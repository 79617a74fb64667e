//! Intermediate extraction types.
//!
//! These types represent the raw output of tree-sitter extraction, before
//! conversion to the domain model in `crate::types`.

use std::collections::BTreeSet;

use crate::types::SymbolKind;

/// A top-level declaration found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDeclaration {
    /// Declared name (`anonymous` for unnamed default exports)
    pub name: String,
    /// Declaration kind
    pub kind: SymbolKind,
    /// Line number (1-indexed)
    pub line: u32,
    /// Whether the declaration is exported from its file
    pub exported: bool,
    /// Identifier tokens inside the declaration.
    ///
    /// Empty for kinds that don't track references.
    pub references: BTreeSet<String>,
}

/// An import statement found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImport {
    /// Named bindings, then the default binding, then `* as <name>`
    pub imported_names: Vec<String>,
    /// Module specifier without quotes
    pub specifier: String,
    /// Line number (1-indexed)
    pub line: u32,
}
