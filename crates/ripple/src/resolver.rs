//! Module specifier resolution for TypeScript and JavaScript imports.
//!
//! Maps import specifiers to file identities within the project. Package
//! imports and anything else outside the project return `None`, since we
//! can't analyze external code.

use std::path::{Path, PathBuf};

use crate::project::{normalize_lexically, Project};
use crate::types::Language;

/// Extension swaps tried when a specifier names the compiled output
/// (`./util.js` written in `util.ts`).
const OUTPUT_EXTENSION_SWAPS: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

/// Declaration-file suffixes, probed after the source extensions.
const DECLARATION_EXTENSIONS: &[&str] = &["d.ts", "d.mts", "d.cts"];

/// Resolves import specifiers against a loaded [`Project`].
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    project: &'a Project,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver over the project's file set and path settings.
    #[must_use]
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Resolve a module specifier written in `importing_file`.
    ///
    /// # Returns
    /// * `Some(PathBuf)` - Identity of the project file the specifier names
    /// * `None` - External package or unresolvable specifier
    #[must_use]
    pub fn resolve(&self, specifier: &str, importing_file: &Path) -> Option<PathBuf> {
        if specifier.is_empty() {
            return None;
        }

        if is_relative(specifier) || specifier.starts_with('/') {
            let base = importing_file.parent()?;
            return self.probe(&base.join(specifier));
        }

        for mapping in self.project.path_mappings() {
            let Some(captured) = mapping.capture(specifier) else {
                continue;
            };
            for target in &mapping.targets {
                let candidate = self
                    .project
                    .paths_base()
                    .join(target.replacen('*', captured, 1));
                if let Some(found) = self.probe(&candidate) {
                    return Some(found);
                }
            }
        }

        self.project
            .base_url()
            .and_then(|base| self.probe(&base.join(specifier)))
    }

    /// Try a candidate path as-is, with extensions, with an output extension
    /// swapped for its source counterpart, then as a directory index.
    fn probe(&self, candidate: &Path) -> Option<PathBuf> {
        let candidate = normalize_lexically(candidate);

        if self.project.contains(&candidate) {
            return Some(candidate);
        }

        if let Some(found) = self.with_extension_appended(&candidate) {
            return Some(found);
        }

        if let Some(ext) = candidate.extension().and_then(|e| e.to_str()) {
            if let Some((_, replacements)) = OUTPUT_EXTENSION_SWAPS.iter().find(|(from, _)| *from == ext) {
                for replacement in *replacements {
                    let swapped = candidate.with_extension(replacement);
                    if self.project.contains(&swapped) {
                        return Some(swapped);
                    }
                }
            }
        }

        self.with_extension_appended(&candidate.join("index"))
    }

    /// `foo` -> `foo.ts`, `foo.tsx`, ..., then `foo.d.ts`, `foo.d.mts`, `foo.d.cts`.
    fn with_extension_appended(&self, base: &Path) -> Option<PathBuf> {
        let file_name = base.file_name()?.to_str()?;
        Language::SOURCE_EXTENSIONS
            .iter()
            .chain(DECLARATION_EXTENSIONS)
            .find_map(|ext| {
                let candidate = base.with_file_name(format!("{file_name}.{ext}"));
                self.project.contains(&candidate).then_some(candidate)
            })
    }
}

/// Whether a specifier is relative to the importing file.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}
