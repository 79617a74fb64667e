//! Domain types for Ripple blast radius analysis.
//!
//! These types represent the core domain model:
//! - **Extraction**: `SymbolInfo`, `ImportInfo`, `DependencyNode` (one per file, rebuilt per build)
//! - **Graph**: `DependencyEdge`, `TransitiveDependent`, `Cycle`, `BuildStats`
//! - **Results**: `ImpactedFile`, `BlastRadiusResult` (produced fresh per analysis)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | File identity | Absolute canonical `PathBuf` | Same scheme the resolver produces |
//! | Tag sets | `BTreeSet<RiskTag>` | Set semantics with stable iteration |
//! | Timestamps | `chrono::DateTime<Utc>` | Serializes as RFC 3339 |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ExtractError;

// ============================================================================
// Enums
// ============================================================================

/// Supported source languages.
///
/// The TypeScript grammar is a superset of JavaScript, so JavaScript files are
/// parsed with it as well; JSX-bearing files use the TSX grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// TypeScript source files (`.ts`, `.mts`, `.cts`)
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
    /// JavaScript source files (`.js`, `.mjs`, `.cjs`)
    JavaScript,
    /// JavaScript with JSX (`.jsx`)
    Jsx,
}

impl Language {
    /// Every file extension the extractor picks up during discovery.
    pub const SOURCE_EXTENSIONS: &'static [&'static str] =
        &["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"];

    /// File extensions handled by this language.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
            Self::JavaScript => &["js", "mjs", "cjs"],
            Self::Jsx => &["jsx"],
        }
    }

    /// Detect language from file extension.
    ///
    /// # Returns
    ///
    /// `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            _ => None,
        }
    }

    /// Detect language from a file path's extension.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Convert to display string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
        }
    }
}

/// Kinds of exported declarations tracked by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Function declaration
    Function,
    /// Class declaration
    Class,
    /// One binding of a `const`/`let`/`var` statement
    Variable,
    /// Interface declaration
    Interface,
    /// Type alias
    Type,
    /// Enum declaration
    Enum,
}

impl SymbolKind {
    /// Convert to display string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Enum => "enum",
        }
    }

    /// Parse a kind from its display string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "function" => Some(Self::Function),
            "class" => Some(Self::Class),
            "variable" => Some(Self::Variable),
            "interface" => Some(Self::Interface),
            "type" => Some(Self::Type),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Whether identifier references are collected for declarations of this kind.
    ///
    /// Interfaces, type aliases and enums never carry references.
    #[must_use]
    pub fn tracks_references(&self) -> bool {
        matches!(self, Self::Function | Self::Class | Self::Variable)
    }
}

/// Relationship kind of a dependency edge.
///
/// Only `Import` edges are produced today; the other variants are reserved so
/// serialized results keep a stable vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// `import ... from '...'`
    Import,
    /// Call site reference
    Call,
    /// Type position reference
    TypeReference,
    /// `class A extends B`
    Extends,
    /// `class A implements I`
    Implements,
    /// `export ... from '...'`
    Reexport,
}

impl EdgeKind {
    /// Convert to display string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Call => "call",
            Self::TypeReference => "type-reference",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Reexport => "reexport",
        }
    }
}

/// Risk categories heuristically assigned to files and symbols.
///
/// Ordering follows declaration order so tag sets print consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTag {
    /// Authentication and sessions
    Auth,
    /// Persistence and queries
    Database,
    /// Input validation and sanitization
    Validation,
    /// HTTP endpoints and clients
    Api,
    /// Application state management
    State,
    /// Cryptography and permissions
    Security,
    /// Billing and payment flows
    Payment,
    /// Configuration and environment
    Config,
    /// Schema or data migrations
    Migration,
    /// Test code
    Test,
}

impl RiskTag {
    /// All tags, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Auth,
        Self::Database,
        Self::Validation,
        Self::Api,
        Self::State,
        Self::Security,
        Self::Payment,
        Self::Config,
        Self::Migration,
        Self::Test,
    ];

    /// Built-in base weight of the tag (0-100).
    #[must_use]
    pub const fn base_weight(self) -> u8 {
        match self {
            Self::Security | Self::Payment => 95,
            Self::Auth => 90,
            Self::Database => 85,
            Self::Migration => 80,
            Self::Api => 70,
            Self::Validation => 65,
            Self::State => 60,
            Self::Config => 50,
            Self::Test => 20,
        }
    }

    /// Convert to display string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Database => "database",
            Self::Validation => "validation",
            Self::Api => "api",
            Self::State => "state",
            Self::Security => "security",
            Self::Payment => "payment",
            Self::Config => "config",
            Self::Migration => "migration",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for RiskTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk classification derived from a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 40
    Low,
    /// Score 40-59
    Medium,
    /// Score 60-79
    High,
    /// Score 80 and above
    Critical,
}

impl RiskLevel {
    /// Classify a score: `>=80` critical, `>=60` high, `>=40` medium, else low.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Critical,
            60..=79 => Self::High,
            40..=59 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Convert to display string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Extraction results
// ============================================================================

/// An exported declaration of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Declared name (`anonymous` for unnamed default exports)
    pub name: String,
    /// Declaration kind
    pub kind: SymbolKind,
    /// Line of the declaration (1-indexed)
    pub definition_line: u32,
    /// Identifiers textually referenced by the declaration.
    ///
    /// Always empty for interfaces, type aliases and enums.
    pub referenced_symbol_names: BTreeSet<String>,
}

/// One import statement of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    /// Bound names: named imports, then the default binding, then `* as <name>`.
    pub imported_symbol_names: Vec<String>,
    /// Module specifier text without quotes (e.g., `./auth`)
    pub module_specifier_text: String,
    /// Project-local file the specifier resolves to, if any
    pub resolved_file_identity: Option<PathBuf>,
}

impl ImportInfo {
    /// Whether this import explicitly names `symbol` (exact string match).
    #[must_use]
    pub fn names(&self, symbol: &str) -> bool {
        self.imported_symbol_names.iter().any(|s| s == symbol)
    }
}

/// Extraction result for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    /// Absolute path of the file
    pub file_identity: PathBuf,
    /// Exported declarations
    pub exports: Vec<SymbolInfo>,
    /// Import statements in source order
    pub imports: Vec<ImportInfo>,
}

impl DependencyNode {
    /// Names of all exported symbols, in export order.
    #[must_use]
    pub fn export_names(&self) -> Vec<String> {
        self.exports.iter().map(|s| s.name.clone()).collect()
    }
}

/// Where a symbol is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocation {
    /// File containing the declaration
    pub file_identity: PathBuf,
    /// Line of the declaration (1-indexed)
    pub line: u32,
}

// ============================================================================
// Graph results
// ============================================================================

/// A directed relationship between two files (`from` depends on `to`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Importing file
    pub from: PathBuf,
    /// Imported file
    pub to: PathBuf,
    /// Relationship kind
    pub kind: EdgeKind,
    /// Names bound by the relationship
    pub symbols: Vec<String>,
}

impl DependencyEdge {
    /// Whether either endpoint is `path`.
    #[must_use]
    pub fn touches(&self, path: &std::path::Path) -> bool {
        self.from == path || self.to == path
    }
}

/// A file reached by reverse-import traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitiveDependent {
    /// The dependent file
    pub path: PathBuf,
    /// Hop count from the start file (1 = direct importer)
    pub distance: usize,
}

/// A circular import chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Files participating in the cycle, sorted
    pub files: Vec<PathBuf>,
}

/// Statistics from a graph build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Files the extractor reported for the project
    pub files_discovered: usize,
    /// Files successfully turned into nodes
    pub files_parsed: usize,
    /// Files skipped (outside the project or failed)
    pub files_skipped: usize,
    /// Import edges created
    pub edges: usize,
    /// Imports whose target could not be resolved to a project file
    pub unresolved_imports: usize,
    /// Directories that could not be read during discovery
    pub directories_skipped: Vec<(PathBuf, String)>,
    /// Per-file extraction failures
    pub errors: Vec<ExtractError>,
    /// Wall-clock time spent building
    pub duration: Duration,
}

// ============================================================================
// Analysis results
// ============================================================================

/// A file affected by a change, with its risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactedFile {
    /// File identity
    pub path: PathBuf,
    /// Names the file exports (a report aid, not the cause of impact)
    pub symbols: Vec<String>,
    /// Level after distance decay
    pub risk_level: RiskLevel,
    /// Hop count from the target file
    pub distance: usize,
    /// Tags from the file's path and exported names
    pub risk_tags: BTreeSet<RiskTag>,
}

/// The blast radius of changing one symbol in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastRadiusResult {
    /// The file being changed
    pub target_file: PathBuf,
    /// The symbol being changed
    pub target_symbol: String,
    /// Affected files, ascending by distance
    pub impacted_files: Vec<ImpactedFile>,
    /// Aggregate score (0-100)
    pub total_risk_score: u8,
    /// Union of the target's and every impacted file's tags
    pub risk_tags: BTreeSet<RiskTag>,
    /// Graph edges touching the target or any impacted file
    pub dependency_chain: Vec<DependencyEdge>,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl BlastRadiusResult {
    /// Coarse level of the aggregate score.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.total_risk_score)
    }

    /// Whether nothing besides the target is affected.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.impacted_files.is_empty()
    }
}
