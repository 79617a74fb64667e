//! Source symbol extraction.
//!
//! The [`SourceExtractor`] turns one project file into a [`DependencyNode`]:
//! its exported declarations (with the identifiers each one references) and
//! its import statements (with best-effort resolution to project files).
//!
//! The extractor must be initialized with a project before use. Queries made
//! before [`SourceExtractor::initialize`] fail with [`Error::NotInitialized`].

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, ExtractError, Result};
use crate::languages::common::{ExtractedDeclaration, ExtractedImport};
use crate::languages::{get_language_support, typescript};
use crate::project::Project;
use crate::resolver::{is_relative, ModuleResolver};
use crate::types::{DependencyNode, ImportInfo, Language, SymbolInfo, SymbolKind, SymbolLocation};

const COMPONENT: &str = "SourceExtractor";

/// Kind order used when scanning a file for a symbol's definition.
const DEFINITION_SCAN_ORDER: [SymbolKind; 6] = [
    SymbolKind::Function,
    SymbolKind::Class,
    SymbolKind::Interface,
    SymbolKind::Type,
    SymbolKind::Enum,
    SymbolKind::Variable,
];

/// Raw syntax facts of one file, before conversion to the domain model.
struct ParsedSource {
    declarations: Vec<ExtractedDeclaration>,
    imports: Vec<ExtractedImport>,
}

/// Parses project files into dependency nodes.
pub struct SourceExtractor {
    project: Option<Project>,
    parser: tree_sitter::Parser,
}

impl Default for SourceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::missing_errors_doc)]
impl SourceExtractor {
    /// Create an uninitialized extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: None,
            parser: tree_sitter::Parser::new(),
        }
    }

    /// Load the project rooted at `root`.
    ///
    /// With `project_config`, files and resolution settings come from that
    /// tsconfig-style file; otherwise every source file under `root` is used.
    /// Replaces any previously loaded project.
    pub fn initialize(
        &mut self,
        root: &Path,
        project_config: Option<&Path>,
        exclude_paths: &[String],
    ) -> Result<()> {
        let project = match project_config {
            Some(config) => Project::from_tsconfig(root, config, exclude_paths)?,
            None => Project::discover(root, exclude_paths)?,
        };

        debug!(
            root = %project.root().display(),
            files = project.len(),
            config = ?project_config,
            "Extractor initialized"
        );

        self.project = Some(project);
        Ok(())
    }

    /// Whether a project is loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.project.is_some()
    }

    /// Drop the loaded project.
    pub fn dispose(&mut self) {
        self.project = None;
    }

    /// The loaded project.
    pub fn project(&self) -> Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| Error::not_initialized(COMPONENT))
    }

    /// Every project file identity, in sorted order.
    pub fn get_all_source_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.project()?.files().cloned().collect())
    }

    /// Extract one file.
    ///
    /// `file` may be absolute or relative to the project root.
    ///
    /// # Returns
    /// * `Ok(Some(node))` - The file's exports and imports
    /// * `Ok(None)` - The file is not part of the project
    /// * `Err(Error::Extract(_))` - The file could not be read or parsed
    pub fn parse_file(&mut self, file: &Path) -> Result<Option<DependencyNode>> {
        let project = self
            .project
            .as_ref()
            .ok_or_else(|| Error::not_initialized(COMPONENT))?;

        let identity = project.identity(file);
        if !project.contains(&identity) {
            debug!(file = %file.display(), "File is not part of the project, skipping");
            return Ok(None);
        }

        let parsed = parse_source(&mut self.parser, &identity)?;
        let resolver = ModuleResolver::new(project);

        let exports = typescript::exported_in_kind_order(&parsed.declarations)
            .into_iter()
            .map(|decl| SymbolInfo {
                name: decl.name,
                kind: decl.kind,
                definition_line: decl.line,
                referenced_symbol_names: decl.references,
            })
            .collect();

        let imports = parsed
            .imports
            .into_iter()
            .map(|import| {
                let resolved = resolver.resolve(&import.specifier, &identity);
                if resolved.is_none() && is_relative(&import.specifier) {
                    debug!(
                        file = %identity.display(),
                        specifier = %import.specifier,
                        line = import.line,
                        "Unresolved relative import"
                    );
                }
                ImportInfo {
                    imported_symbol_names: import.imported_names,
                    module_specifier_text: import.specifier,
                    resolved_file_identity: resolved,
                }
            })
            .collect();

        Ok(Some(DependencyNode {
            file_identity: identity,
            exports,
            imports,
        }))
    }

    /// Find every top-level declaration named `name`, exported or not.
    ///
    /// Files are scanned in sorted path order; within a file, functions come
    /// first, then classes, interfaces, types, enums and variables. Files
    /// that fail to parse are skipped.
    pub fn find_symbol_definition(&mut self, name: &str) -> Result<Vec<SymbolLocation>> {
        let files = self.get_all_source_files()?;
        let mut locations = Vec::new();

        for file in files {
            let parsed = match parse_source(&mut self.parser, &file) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(error = %e, "Skipping file during definition search");
                    continue;
                }
            };

            for kind in DEFINITION_SCAN_ORDER {
                locations.extend(
                    parsed
                        .declarations
                        .iter()
                        .filter(|d| d.kind == kind && d.name == name)
                        .map(|d| SymbolLocation {
                            file_identity: file.clone(),
                            line: d.line,
                        }),
                );
            }
        }

        trace!(symbol = %name, found = locations.len(), "Definition search complete");
        Ok(locations)
    }
}

/// Read and parse one file with the grammar its extension selects.
fn parse_source(
    parser: &mut tree_sitter::Parser,
    path: &Path,
) -> std::result::Result<ParsedSource, ExtractError> {
    let Some(language) = Language::from_path(path) else {
        return Err(ExtractError::unsupported_language(path.to_path_buf()));
    };

    let bytes =
        std::fs::read(path).map_err(|e| ExtractError::io_error(path.to_path_buf(), &e))?;
    let content =
        String::from_utf8(bytes).map_err(|_| ExtractError::encoding_error(path.to_path_buf()))?;

    parser
        .set_language(&get_language_support(language).tree_sitter_language())
        .map_err(|e| ExtractError::parse_failed(path.to_path_buf(), e.to_string()))?;

    let tree = parser.parse(&content, None).ok_or_else(|| {
        ExtractError::parse_failed(path.to_path_buf(), "tree-sitter returned no tree")
    })?;

    if tree.root_node().has_error() {
        // tree-sitter recovers from syntax errors; keep what it could read.
        debug!(file = %path.display(), "Syntax errors in file, extraction is partial");
    }

    Ok(ParsedSource {
        declarations: typescript::extract_declarations(&tree, content.as_bytes()),
        imports: typescript::extract_imports(&tree, content.as_bytes()),
    })
}
