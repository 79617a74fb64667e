//! Language-specific syntax support.
//!
//! Each supported grammar implements the `LanguageSupport` trait, which tells
//! the extractor which file extensions it owns and which tree-sitter language
//! to parse them with. Extraction itself lives in `typescript`, since every
//! supported language shares the TypeScript grammar's node vocabulary.
//!
//! ## Adding a New Language
//!
//! 1. Add the variant to `Language` enum in `types.rs`
//! 2. Implement `LanguageSupport` for its grammar
//! 3. Register in `get_language_support()`

pub mod common;
pub mod tree_sitter_utils;
pub mod typescript;

use crate::types::Language;

/// Get the language support implementation for a language.
#[must_use]
pub fn get_language_support(lang: Language) -> &'static dyn LanguageSupport {
    match lang {
        Language::TypeScript | Language::JavaScript => &typescript::TypeScriptLanguage,
        Language::Tsx | Language::Jsx => &typescript::TsxLanguage,
    }
}

/// Trait for grammar-specific parsing configuration.
pub trait LanguageSupport: Send + Sync {
    /// File extensions this grammar handles.
    fn extensions(&self) -> &[&str];

    /// Get the tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;
}
