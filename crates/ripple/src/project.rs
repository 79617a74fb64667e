//! Project file discovery.
//!
//! A [`Project`] is the set of source files Ripple analyzes, plus the module
//! resolution settings that come with them. It is loaded in one of two ways:
//!
//! - **Default discovery**: walk the root directory recursively, skipping
//!   hidden directories and common build/vendor directories.
//! - **tsconfig**: read a `tsconfig.json`-style file and apply its `files`,
//!   `include` and `exclude` lists, along with `compilerOptions.baseUrl` and
//!   `compilerOptions.paths` for import resolution.
//!
//! Every file is identified by its absolute, canonicalized path.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::Language;

/// Directory names never descended into during discovery.
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "out",
    "coverage",
    "target",
    "vendor",
    "bin",
    "obj",
    "__pycache__",
];

/// `*` stops at `/`, `**` crosses directories, and dotfiles are not special.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A `compilerOptions.paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    /// Specifier pattern, with at most one `*`
    pub pattern: String,
    /// Substitution targets, relative to the resolution base
    pub targets: Vec<String>,
}

impl PathMapping {
    /// Match a specifier against this mapping.
    ///
    /// Returns the text captured by `*` (empty for exact patterns), or `None`
    /// if the specifier does not match.
    #[must_use]
    pub fn capture<'a>(&self, specifier: &'a str) -> Option<&'a str> {
        match self.pattern.split_once('*') {
            None => (self.pattern == specifier).then_some(""),
            Some((prefix, suffix)) => {
                if specifier.len() < prefix.len() + suffix.len() {
                    return None;
                }
                specifier
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.strip_suffix(suffix))
            }
        }
    }

    /// Length of the literal prefix before `*`; longer prefixes are more specific.
    fn specificity(&self) -> usize {
        self.pattern
            .split_once('*')
            .map_or(usize::MAX, |(prefix, _)| prefix.len())
    }
}

/// The set of files under analysis, with their resolution settings.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    files: BTreeSet<PathBuf>,
    base_url: Option<PathBuf>,
    paths_base: PathBuf,
    path_mappings: Vec<PathMapping>,
    directories_skipped: Vec<(PathBuf, String)>,
}

#[allow(clippy::missing_errors_doc)]
impl Project {
    /// Discover every source file under `root`.
    ///
    /// `exclude_paths` are globs relative to `root`; a match on a directory
    /// skips the whole subtree.
    pub fn discover(root: &Path, exclude_paths: &[String]) -> Result<Self> {
        let root = canonical_root(root)?;
        let excludes = compile_globs(exclude_paths)?;

        let mut walker = Walker::new(&root, &excludes);
        walker.walk(&root);
        let Walker { files, skipped, .. } = walker;

        debug!(
            root = %root.display(),
            files = files.len(),
            "Discovered project files"
        );

        Ok(Self {
            paths_base: root.clone(),
            root,
            files,
            base_url: None,
            path_mappings: Vec::new(),
            directories_skipped: skipped,
        })
    }

    /// Load a project from a `tsconfig.json`-style file.
    ///
    /// Patterns in the config are relative to the config file's directory.
    /// `exclude_paths` still applies, relative to `root`.
    pub fn from_tsconfig(root: &Path, config_path: &Path, exclude_paths: &[String]) -> Result<Self> {
        let root = canonical_root(root)?;
        let config_path = if config_path.is_absolute() {
            config_path.to_path_buf()
        } else {
            root.join(config_path)
        };
        let text = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("project config not readable: {}", config_path.display()),
            ))
        })?;
        let config: TsConfig = serde_json::from_str(&strip_json_comments(&text))?;

        let config_dir = config_path
            .parent()
            .map_or_else(|| root.clone(), Path::to_path_buf);
        let config_dir = config_dir.canonicalize().unwrap_or(config_dir);

        if let Some(extends) = &config.extends {
            debug!(extends = %extends, "Ignoring tsconfig extends");
        }

        let options = config.compiler_options.unwrap_or_default();

        let include = match (&config.include, &config.files) {
            (Some(include), _) => include.clone(),
            // Only an explicit `files` list: no globbing.
            (None, Some(_)) => Vec::new(),
            (None, None) => vec!["**/*".to_string()],
        };
        let mut exclude = config
            .exclude
            .clone()
            .unwrap_or_else(|| vec!["node_modules".to_string(), "dist".to_string()]);
        if config.exclude.is_none() {
            if let Some(out_dir) = &options.out_dir {
                exclude.push(out_dir.clone());
            }
        }

        let include = compile_globs(&expand_directory_patterns(&config_dir, &include))?;
        let exclude = compile_globs(&expand_directory_patterns(&config_dir, &exclude))?;
        let root_excludes = compile_globs(exclude_paths)?;

        let mut walker = Walker::new(&root, &root_excludes);
        if !include.is_empty() {
            walker.walk(&config_dir);
        }
        let Walker {
            files: walked,
            skipped,
            ..
        } = walker;

        let mut files: BTreeSet<PathBuf> = walked
            .into_iter()
            .filter(|file| {
                let rel = slash_path(relative_to(file, &config_dir));
                include.iter().any(|p| p.matches_with(&rel, GLOB_OPTIONS))
                    && !exclude.iter().any(|p| p.matches_with(&rel, GLOB_OPTIONS))
            })
            .collect();

        for listed in config.files.iter().flatten() {
            let path = config_dir.join(listed);
            if path.is_file() && Language::from_path(&path).is_some() {
                files.insert(canonical_file(&path));
            } else {
                warn!(file = %path.display(), "File listed in project config not found, skipping");
            }
        }

        let base_url = options.base_url.as_ref().map(|b| {
            let joined = config_dir.join(b);
            joined.canonicalize().unwrap_or(joined)
        });
        let paths_base = base_url.clone().unwrap_or_else(|| config_dir.clone());

        let mut path_mappings: Vec<PathMapping> = options
            .paths
            .into_iter()
            .map(|(pattern, targets)| PathMapping { pattern, targets })
            .collect();
        // Exact patterns first, then longest prefix.
        path_mappings.sort_by(|a, b| b.specificity().cmp(&a.specificity()));

        debug!(
            config = %config_path.display(),
            files = files.len(),
            mappings = path_mappings.len(),
            "Loaded project from config"
        );

        Ok(Self {
            root,
            files,
            base_url,
            paths_base,
            path_mappings,
            directories_skipped: skipped,
        })
    }

    /// Canonical project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All project files, in sorted path order.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Number of project files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the project has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `path` (an identity) belongs to the project.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// `compilerOptions.baseUrl`, resolved.
    #[must_use]
    pub fn base_url(&self) -> Option<&Path> {
        self.base_url.as_deref()
    }

    /// Directory that `paths` targets are relative to.
    #[must_use]
    pub fn paths_base(&self) -> &Path {
        &self.paths_base
    }

    /// `compilerOptions.paths`, most specific pattern first.
    #[must_use]
    pub fn path_mappings(&self) -> &[PathMapping] {
        &self.path_mappings
    }

    /// Directories that could not be read during discovery.
    #[must_use]
    pub fn directories_skipped(&self) -> &[(PathBuf, String)] {
        &self.directories_skipped
    }

    /// Normalize a user-supplied path (relative to the root, or absolute) to a
    /// file identity.
    ///
    /// The result is not guaranteed to be a project file; use [`contains`](Self::contains).
    #[must_use]
    pub fn identity(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        match joined.canonicalize() {
            Ok(canonical) => canonical,
            Err(_) => normalize_lexically(&joined),
        }
    }

    /// Path relative to the project root, or the path itself when outside it.
    #[must_use]
    pub fn relative_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

// ============================================================================
// tsconfig
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    extends: Option<String>,
    compiler_options: Option<CompilerOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    base_url: Option<String>,
    out_dir: Option<String>,
    #[serde(default)]
    paths: std::collections::BTreeMap<String, Vec<String>>,
}

/// Remove `//` and `/* */` comments and trailing commas, leaving string
/// literals untouched.
#[must_use]
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    strip_trailing_commas(&out)
}

fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if !matches!(next, Some('}' | ']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

/// Turn bare directory patterns (`src`) into `src/**/*`.
fn expand_directory_patterns(base: &Path, patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| {
            let trimmed = p.trim_start_matches("./").trim_end_matches('/');
            let has_wildcard = trimmed.contains(['*', '?', '[']);
            if !has_wildcard && (base.join(trimmed).is_dir() || Path::new(trimmed).extension().is_none())
            {
                format!("{trimmed}/**/*")
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

// ============================================================================
// Discovery
// ============================================================================

struct Walker<'a> {
    root: &'a Path,
    excludes: &'a [Pattern],
    files: BTreeSet<PathBuf>,
    skipped: Vec<(PathBuf, String)>,
}

impl<'a> Walker<'a> {
    fn new(root: &'a Path, excludes: &'a [Pattern]) -> Self {
        Self {
            root,
            excludes,
            files: BTreeSet::new(),
            skipped: Vec::new(),
        }
    }

    fn walk(&mut self, dir: &Path) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Cannot read directory, skipping"
                );
                self.skipped.push((dir.to_path_buf(), e.to_string()));
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(
                        directory = %dir.display(),
                        error = %e,
                        "Failed to read directory entry, skipping"
                    );
                    continue;
                }
            };

            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') || is_excluded_dir(name) {
                    continue;
                }
            }
            if self.is_user_excluded(&path) {
                debug!(path = %path.display(), "Excluded by configuration");
                continue;
            }

            if path.is_dir() {
                self.walk(&path);
            } else if path.is_file() && Language::from_path(&path).is_some() {
                self.files.insert(canonical_file(&path));
            }
        }
    }

    fn is_user_excluded(&self, path: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let rel = slash_path(relative_to(path, self.root));
        self.excludes
            .iter()
            .any(|p| p.matches_with(&rel, GLOB_OPTIONS))
    }
}

/// Check if a directory should be excluded from discovery.
fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::Config(format!("invalid glob pattern '{p}': {e}")))
        })
        .collect()
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize().map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("project root not found: {}", root.display()),
        ))
    })
}

fn canonical_file(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

/// Forward-slash form of a path, for glob matching.
fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn workspace_with_files(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().expect("should create temp dir");
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("should create parent dirs");
            }
            fs::write(&full, content).expect("should write file");
        }
        dir
    }

    fn relative_names(project: &Project) -> Vec<String> {
        project
            .files()
            .map(|f| slash_path(project.relative_path(f)))
            .collect()
    }

    #[test]
    fn discovery_finds_supported_extensions_only() {
        let dir = workspace_with_files(&[
            ("src/a.ts", ""),
            ("src/b.tsx", ""),
            ("src/c.js", ""),
            ("src/d.mjs", ""),
            ("README.md", ""),
            ("style.css", ""),
        ]);

        let project = Project::discover(dir.path(), &[]).expect("discovery should succeed");

        assert_eq!(
            relative_names(&project),
            vec!["src/a.ts", "src/b.tsx", "src/c.js", "src/d.mjs"]
        );
    }

    #[test]
    fn discovery_skips_hidden_and_build_directories() {
        let dir = workspace_with_files(&[
            ("src/a.ts", ""),
            ("node_modules/lib/index.js", ""),
            ("dist/a.js", ""),
            (".cache/x.ts", ""),
            ("coverage/report.js", ""),
        ]);

        let project = Project::discover(dir.path(), &[]).expect("discovery should succeed");

        assert_eq!(relative_names(&project), vec!["src/a.ts"]);
    }

    #[test]
    fn exclude_paths_skip_matching_subtrees() {
        let dir = workspace_with_files(&[
            ("src/a.ts", ""),
            ("legacy/old.ts", ""),
            ("src/gen/types.ts", ""),
        ]);

        let project = Project::discover(
            dir.path(),
            &["legacy".to_string(), "src/gen/**".to_string()],
        )
        .expect("discovery should succeed");

        assert_eq!(relative_names(&project), vec!["src/a.ts"]);
    }

    #[test]
    fn invalid_exclude_glob_is_config_error() {
        let dir = workspace_with_files(&[("a.ts", "")]);

        let result = Project::discover(dir.path(), &["[".to_string()]);

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_root_is_io_error() {
        let result = Project::discover(Path::new("/definitely/not/here"), &[]);

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn tsconfig_include_and_exclude() {
        let dir = workspace_with_files(&[
            (
                "tsconfig.json",
                r#"{
                    // project layout
                    "include": ["src"],
                    "exclude": ["src/**/*.test.ts"],
                }"#,
            ),
            ("src/a.ts", ""),
            ("src/a.test.ts", ""),
            ("scripts/build.ts", ""),
        ]);

        let project = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[])
            .expect("config should load");

        assert_eq!(relative_names(&project), vec!["src/a.ts"]);
    }

    #[test]
    fn tsconfig_files_list_without_include() {
        let dir = workspace_with_files(&[
            ("tsconfig.json", r#"{ "files": ["main.ts"] }"#),
            ("main.ts", ""),
            ("other.ts", ""),
        ]);

        let project = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[])
            .expect("config should load");

        assert_eq!(relative_names(&project), vec!["main.ts"]);
    }

    #[test]
    fn tsconfig_default_exclude_drops_out_dir() {
        let dir = workspace_with_files(&[
            (
                "tsconfig.json",
                r#"{ "compilerOptions": { "outDir": "lib" } }"#,
            ),
            ("src/a.ts", ""),
            ("lib/a.js", ""),
        ]);

        let project = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[])
            .expect("config should load");

        assert_eq!(relative_names(&project), vec!["src/a.ts"]);
    }

    #[test]
    fn tsconfig_paths_and_base_url() {
        let dir = workspace_with_files(&[
            (
                "tsconfig.json",
                r#"{
                    "compilerOptions": {
                        "baseUrl": "./src",
                        "paths": { "@app/*": ["app/*"], "@app/core": ["core/index"] }
                    }
                }"#,
            ),
            ("src/app/a.ts", ""),
        ]);

        let project = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[])
            .expect("config should load");

        let base = project.base_url().expect("baseUrl should be set");
        assert!(base.ends_with("src"));
        assert_eq!(project.paths_base(), base);
        assert_eq!(project.path_mappings()[0].pattern, "@app/core", "exact pattern first");
        assert_eq!(project.path_mappings()[1].pattern, "@app/*");
    }

    #[test]
    fn missing_tsconfig_is_io_error() {
        let dir = workspace_with_files(&[("a.ts", "")]);

        let result = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[]);

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn malformed_tsconfig_is_json_error() {
        let dir = workspace_with_files(&[("tsconfig.json", "{ include: [ }")]);

        let result = Project::from_tsconfig(dir.path(), Path::new("tsconfig.json"), &[]);

        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn identity_accepts_relative_and_absolute_paths() {
        let dir = workspace_with_files(&[("src/a.ts", "")]);
        let project = Project::discover(dir.path(), &[]).expect("discovery should succeed");

        let from_relative = project.identity(Path::new("src/a.ts"));
        let from_absolute = project.identity(&dir.path().join("src/a.ts"));

        assert_eq!(from_relative, from_absolute);
        assert!(project.contains(&from_relative));
        assert!(!project.contains(&project.identity(Path::new("src/missing.ts"))));
    }

    #[rstest]
    #[case::exact("@core", "@core", Some(""))]
    #[case::exact_mismatch("@core", "@core/x", None)]
    #[case::wildcard("@app/*", "@app/users/list", Some("users/list"))]
    #[case::wildcard_with_suffix("*.generated", "api.generated", Some("api"))]
    #[case::wildcard_mismatch("@app/*", "@lib/x", None)]
    fn path_mapping_capture(
        #[case] pattern: &str,
        #[case] specifier: &str,
        #[case] expected: Option<&str>,
    ) {
        let mapping = PathMapping {
            pattern: pattern.to_string(),
            targets: vec![],
        };

        assert_eq!(mapping.capture(specifier), expected);
    }

    #[test]
    fn strip_comments_keeps_strings_intact() {
        let input = r#"{
            // line comment
            "url": "http://example.com/*not a comment*/", /* block */
            "list": [1, 2,],
        }"#;

        let stripped = strip_json_comments(input);
        let value: serde_json::Value =
            serde_json::from_str(&stripped).expect("stripped config should be valid JSON");

        assert_eq!(value["url"], "http://example.com/*not a comment*/");
        assert_eq!(value["list"], serde_json::json!([1, 2]));
    }

    #[test]
    fn normalize_lexically_resolves_dots() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/./c/../d.ts")),
            PathBuf::from("/a/b/d.ts")
        );
    }
}
