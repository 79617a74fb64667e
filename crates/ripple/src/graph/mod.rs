//! File-level dependency graph.
//!
//! Holds one [`DependencyNode`] per project file, a reverse index of who
//! imports each file, and the flat list of import edges. The graph is built
//! wholesale from a [`SourceExtractor`]; there is no incremental update.
//!
//! ## Edge Direction
//!
//! Edges point from the importing file to the imported file (`from` depends on
//! `to`). Impact analysis walks them backwards through `reverse_imports`.

mod cycles;

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extractor::SourceExtractor;
use crate::types::{BuildStats, Cycle, DependencyEdge, DependencyNode, EdgeKind, TransitiveDependent};

/// Default bound for transitive traversal.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Nodes, reverse imports and edges of one project build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: BTreeMap<PathBuf, DependencyNode>,
    reverse_imports: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index already-extracted nodes.
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = DependencyNode>) -> Self {
        let nodes: BTreeMap<PathBuf, DependencyNode> = nodes
            .into_iter()
            .map(|node| (node.file_identity.clone(), node))
            .collect();

        let mut reverse_imports: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
        let mut edges = Vec::new();

        for (owner, node) in &nodes {
            for import in &node.imports {
                let Some(target) = &import.resolved_file_identity else {
                    continue;
                };
                edges.push(DependencyEdge {
                    from: owner.clone(),
                    to: target.clone(),
                    kind: EdgeKind::Import,
                    symbols: import.imported_symbol_names.clone(),
                });
                reverse_imports
                    .entry(target.clone())
                    .or_default()
                    .insert(owner.clone());
            }
        }

        Self {
            nodes,
            reverse_imports,
            edges,
        }
    }

    /// Rebuild the graph from every file the extractor knows about.
    ///
    /// Prior state is discarded, never merged. Files that fail to extract are
    /// skipped and reported in [`BuildStats::errors`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] if the extractor has no project, or
    /// any other non file-level failure.
    pub fn build(&mut self, extractor: &mut SourceExtractor) -> Result<BuildStats> {
        let start = Instant::now();
        let files = extractor.get_all_source_files()?;

        let mut stats = BuildStats {
            files_discovered: files.len(),
            directories_skipped: extractor.project()?.directories_skipped().to_vec(),
            ..BuildStats::default()
        };
        let mut nodes = Vec::with_capacity(files.len());

        for file in &files {
            match extractor.parse_file(file) {
                Ok(Some(node)) => {
                    stats.unresolved_imports += node
                        .imports
                        .iter()
                        .filter(|i| i.resolved_file_identity.is_none())
                        .count();
                    nodes.push(node);
                }
                Ok(None) => {
                    debug!(file = %file.display(), "File left the project during build, skipping");
                    stats.files_skipped += 1;
                }
                Err(Error::Extract(e)) => {
                    warn!(
                        file = %e.path.display(),
                        kind = %e.kind,
                        error = %e.message,
                        "Failed to extract file, skipping"
                    );
                    stats.errors.push(e);
                    stats.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        stats.files_parsed = nodes.len();
        *self = Self::from_nodes(nodes);
        stats.edges = self.edges.len();
        stats.duration = start.elapsed();

        info!(
            files = stats.files_parsed,
            skipped = stats.files_skipped,
            edges = stats.edges,
            unresolved = stats.unresolved_imports,
            duration_ms = stats.duration.as_millis(),
            "Dependency graph built"
        );

        Ok(stats)
    }

    /// Number of files in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All file identities, in sorted order.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.nodes.keys()
    }

    /// The extracted node for a file.
    #[must_use]
    pub fn get_node(&self, file: &Path) -> Option<&DependencyNode> {
        self.nodes.get(file)
    }

    /// Files that directly import `file`, in sorted order.
    #[must_use]
    pub fn get_dependents(&self, file: &Path) -> Vec<PathBuf> {
        self.reverse_imports
            .get(file)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Files that `file` imports, in import order without duplicates.
    #[must_use]
    pub fn get_dependencies(&self, file: &Path) -> Vec<PathBuf> {
        let Some(node) = self.nodes.get(file) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        node.imports
            .iter()
            .filter_map(|i| i.resolved_file_identity.clone())
            .filter(|target| seen.insert(target.clone()))
            .collect()
    }

    /// Files that depend on `file` directly or through a chain of imports.
    ///
    /// Breadth-first over reverse imports, so each file carries its shortest
    /// hop count. Files at `max_depth` are reported but not expanded. The
    /// start file is never reported, even when it sits on a cycle.
    #[must_use]
    pub fn get_transitive_dependents(&self, file: &Path, max_depth: usize) -> Vec<TransitiveDependent> {
        let mut result = Vec::new();
        let mut visited: HashSet<&Path> = HashSet::new();
        let mut queue: VecDeque<(&Path, usize)> = VecDeque::new();

        visited.insert(file);
        queue.push_back((file, 0));

        while let Some((current, distance)) = queue.pop_front() {
            if distance >= max_depth {
                continue;
            }

            let Some(importers) = self.reverse_imports.get(current) else {
                continue;
            };

            for importer in importers {
                if visited.insert(importer.as_path()) {
                    let next = distance + 1;
                    queue.push_back((importer.as_path(), next));
                    result.push(TransitiveDependent {
                        path: importer.clone(),
                        distance: next,
                    });
                }
            }
        }

        debug!(
            file = %file.display(),
            max_depth,
            found = result.len(),
            "Transitive dependents computed"
        );

        result
    }

    /// Direct dependents of `source_file` whose import of it names `symbol`.
    ///
    /// Matching is on the imported name, exactly as written in the import
    /// specifier; a local alias is not considered. Every import statement
    /// of `source_file` is checked, not only the first.
    #[must_use]
    pub fn find_symbol_usages(&self, symbol: &str, source_file: &Path) -> Vec<PathBuf> {
        self.get_dependents(source_file)
            .into_iter()
            .filter(|dependent| {
                self.nodes.get(dependent).is_some_and(|node| {
                    node.imports.iter().any(|import| {
                        import.resolved_file_identity.as_deref() == Some(source_file)
                            && import.names(symbol)
                    })
                })
            })
            .collect()
    }

    /// Every edge, copied.
    #[must_use]
    pub fn get_all_edges(&self) -> Vec<DependencyEdge> {
        self.edges.clone()
    }

    /// Edges with `file` at either end, copied.
    #[must_use]
    pub fn get_edges_for_file(&self, file: &Path) -> Vec<DependencyEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.touches(file))
            .cloned()
            .collect()
    }

    /// Edges with either end in `files`, copied.
    #[must_use]
    pub fn get_edges_touching(&self, files: &HashSet<&Path>) -> Vec<DependencyEdge> {
        self.edges
            .iter()
            .filter(|edge| files.contains(edge.from.as_path()) || files.contains(edge.to.as_path()))
            .cloned()
            .collect()
    }

    /// Circular import chains.
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<Cycle> {
        cycles::find_cycles(&self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImportInfo, SymbolInfo, SymbolKind};

    fn p(name: &str) -> PathBuf {
        PathBuf::from(format!("/project/{name}"))
    }

    fn export(name: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.to_string(),
            kind: SymbolKind::Function,
            definition_line: 1,
            referenced_symbol_names: BTreeSet::new(),
        }
    }

    fn import(target: &str, names: &[&str]) -> ImportInfo {
        ImportInfo {
            imported_symbol_names: names.iter().map(ToString::to_string).collect(),
            module_specifier_text: format!("./{target}"),
            resolved_file_identity: Some(p(target)),
        }
    }

    fn node(name: &str, exports: &[&str], imports: Vec<ImportInfo>) -> DependencyNode {
        DependencyNode {
            file_identity: p(name),
            exports: exports.iter().map(|e| export(e)).collect(),
            imports,
        }
    }

    #[test]
    fn reverse_index_mirrors_resolved_imports() {
        let mut external = import("react", &["useState"]);
        external.resolved_file_identity = None;
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &["foo"], vec![]),
            node("b.ts", &[], vec![import("a.ts", &["foo"]), external]),
        ]);

        assert_eq!(graph.get_dependents(&p("a.ts")), vec![p("b.ts")]);
        assert!(graph.get_dependents(&p("b.ts")).is_empty());
        assert_eq!(graph.get_all_edges().len(), 1, "unresolved imports create no edge");
        assert_eq!(graph.get_all_edges()[0].kind, EdgeKind::Import);
    }

    #[test]
    fn side_effect_import_still_creates_edge() {
        let graph = DependencyGraph::from_nodes([
            node("polyfill.ts", &[], vec![]),
            node("main.ts", &[], vec![import("polyfill.ts", &[])]),
        ]);

        let edges = graph.get_edges_for_file(&p("polyfill.ts"));
        assert_eq!(edges.len(), 1);
        assert!(edges[0].symbols.is_empty());
    }

    #[test]
    fn dependencies_are_deduplicated_in_import_order() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![]),
            node("b.ts", &[], vec![]),
            node(
                "c.ts",
                &[],
                vec![import("b.ts", &["x"]), import("a.ts", &["y"]), import("b.ts", &["z"])],
            ),
        ]);

        assert_eq!(graph.get_dependencies(&p("c.ts")), vec![p("b.ts"), p("a.ts")]);
        assert!(graph.get_dependencies(&p("missing.ts")).is_empty());
    }

    #[test]
    fn transitive_dependents_on_cycle_visit_each_file_once() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![import("b.ts", &[])]),
            node("b.ts", &[], vec![import("a.ts", &[])]),
        ]);

        let deps = graph.get_transitive_dependents(&p("a.ts"), DEFAULT_MAX_DEPTH);

        assert_eq!(
            deps,
            vec![TransitiveDependent {
                path: p("b.ts"),
                distance: 1
            }]
        );
    }

    #[test]
    fn transitive_dependents_respect_depth_bound() {
        // f1 imports f0, f2 imports f1, ...
        let nodes = (0..10).map(|i| {
            let imports = if i == 0 {
                vec![]
            } else {
                vec![import(&format!("f{}.ts", i - 1), &[])]
            };
            node(&format!("f{i}.ts"), &[], imports)
        });
        let graph = DependencyGraph::from_nodes(nodes);

        let deps = graph.get_transitive_dependents(&p("f0.ts"), 3);

        let found: Vec<(PathBuf, usize)> = deps.into_iter().map(|d| (d.path, d.distance)).collect();
        assert_eq!(
            found,
            vec![(p("f1.ts"), 1), (p("f2.ts"), 2), (p("f3.ts"), 3)]
        );
    }

    #[test]
    fn transitive_dependents_keep_shortest_distance() {
        // d imports both b (distance 1 from a) and c (distance 2 from a).
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![]),
            node("b.ts", &[], vec![import("a.ts", &[])]),
            node("c.ts", &[], vec![import("b.ts", &[])]),
            node("d.ts", &[], vec![import("a.ts", &[]), import("c.ts", &[])]),
        ]);

        let deps = graph.get_transitive_dependents(&p("a.ts"), DEFAULT_MAX_DEPTH);

        let d = deps.iter().find(|d| d.path == p("d.ts")).expect("d.ts is a dependent");
        assert_eq!(d.distance, 1);
        assert_eq!(deps.len(), 3);
    }

    #[test]
    fn zero_depth_returns_nothing() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![]),
            node("b.ts", &[], vec![import("a.ts", &[])]),
        ]);

        assert!(graph.get_transitive_dependents(&p("a.ts"), 0).is_empty());
    }

    #[test]
    fn self_import_does_not_report_start_file() {
        let graph = DependencyGraph::from_nodes([node("a.ts", &[], vec![import("a.ts", &[])])]);

        assert!(graph.get_transitive_dependents(&p("a.ts"), DEFAULT_MAX_DEPTH).is_empty());
    }

    #[test]
    fn symbol_usages_require_explicit_name() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &["foo", "bar"], vec![]),
            node("uses_foo.ts", &[], vec![import("a.ts", &["foo"])]),
            node("uses_bar.ts", &[], vec![import("a.ts", &["bar"])]),
            node("namespace.ts", &[], vec![import("a.ts", &["* as a"])]),
        ]);

        assert_eq!(graph.find_symbol_usages("foo", &p("a.ts")), vec![p("uses_foo.ts")]);
        assert!(graph.find_symbol_usages("baz", &p("a.ts")).is_empty());
    }

    #[test]
    fn symbol_usage_checks_every_import_of_the_source() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &["foo", "Bar"], vec![]),
            node(
                "b.ts",
                &[],
                vec![import("a.ts", &["Bar"]), import("a.ts", &["foo"])],
            ),
        ]);

        assert_eq!(graph.find_symbol_usages("foo", &p("a.ts")), vec![p("b.ts")]);
        assert_eq!(graph.find_symbol_usages("Bar", &p("a.ts")), vec![p("b.ts")]);
    }

    #[test]
    fn symbol_usage_ignores_same_name_from_other_file() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &["foo"], vec![]),
            node("other.ts", &["foo"], vec![]),
            node("b.ts", &[], vec![import("a.ts", &[]), import("other.ts", &["foo"])]),
        ]);

        assert!(graph.find_symbol_usages("foo", &p("a.ts")).is_empty());
    }

    #[test]
    fn edge_accessors_return_copies() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![]),
            node("b.ts", &[], vec![import("a.ts", &["foo"])]),
        ]);

        let mut edges = graph.get_all_edges();
        edges.clear();
        let mut for_file = graph.get_edges_for_file(&p("a.ts"));
        for_file[0].symbols.push("mutated".to_string());

        assert_eq!(graph.get_all_edges().len(), 1);
        assert_eq!(graph.get_all_edges()[0].symbols, vec!["foo"]);
    }

    #[test]
    fn edges_touching_any_of_a_set() {
        let graph = DependencyGraph::from_nodes([
            node("a.ts", &[], vec![]),
            node("b.ts", &[], vec![import("a.ts", &[])]),
            node("c.ts", &[], vec![]),
            node("d.ts", &[], vec![import("c.ts", &[])]),
        ]);
        let b = p("b.ts");
        let files: HashSet<&Path> = [b.as_path()].into_iter().collect();

        let edges = graph.get_edges_touching(&files);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, p("b.ts"));
    }

    #[test]
    fn node_lookup_and_len() {
        let graph = DependencyGraph::from_nodes([node("a.ts", &["foo"], vec![])]);

        assert_eq!(graph.len(), 1);
        assert!(!graph.is_empty());
        assert_eq!(
            graph.get_node(&p("a.ts")).map(DependencyNode::export_names),
            Some(vec!["foo".to_string()])
        );
        assert!(graph.get_node(&p("b.ts")).is_none());
        assert!(DependencyGraph::new().is_empty());
    }
}
