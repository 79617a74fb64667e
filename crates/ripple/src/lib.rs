//! # Ripple: Blast Radius Estimation for TypeScript Projects
//!
//! Ripple answers "what else is affected if I change this symbol?" for
//! TypeScript and JavaScript codebases. It extracts exports and imports from
//! every source file with tree-sitter, builds a file-level dependency graph,
//! walks it backwards from the changed file, and scores the affected area
//! with pattern-based risk tags.
//!
//! ## Design Philosophy
//!
//! - **Structural, not semantic** - Imports and identifier tokens only; no type checking
//! - **Rebuild, don't patch** - The graph is rebuilt wholesale on demand
//! - **Fail soft per file** - One unparseable file never aborts a build
//! - **Tunable heuristics** - Risk tables and the aggregate score are data and policy
//!
//! ## Quick Start
//!
//! ```no_run
//! use ripple::BlastRadiusEngine;
//! use std::path::Path;
//!
//! let mut engine = BlastRadiusEngine::new();
//!
//! // Load the project and build its dependency graph
//! let stats = engine.initialize(Path::new("/path/to/project"), None)?;
//! println!("Parsed {} files, {} import edges", stats.files_parsed, stats.edges);
//!
//! // What breaks if `login` in src/auth.ts changes?
//! let result = engine.analyze(Path::new("src/auth.ts"), "login", 5)?;
//! println!(
//!     "{} files affected, risk score {}",
//!     result.impacted_files.len(),
//!     result.total_risk_score
//! );
//! # Ok::<(), ripple::Error>(())
//! ```

pub mod config;
mod engine;
mod error;
mod extractor;
mod graph;
mod languages;
mod project;
mod resolver;
pub mod risk;
mod types;

pub use config::RippleConfig;
pub use engine::BlastRadiusEngine;
pub use error::{Error, ExtractError, ExtractErrorKind, Result};
pub use extractor::SourceExtractor;
pub use graph::{DependencyGraph, DEFAULT_MAX_DEPTH};
pub use project::{PathMapping, Project};
pub use resolver::ModuleResolver;
pub use risk::{DefaultScorePolicy, RiskTables, RiskTagger, ScorePolicy};
pub use types::{
    BlastRadiusResult, BuildStats, Cycle, DependencyEdge, DependencyNode, EdgeKind, ImpactedFile,
    ImportInfo, Language, RiskLevel, RiskTag, SymbolInfo, SymbolKind, SymbolLocation,
    TransitiveDependent,
};
