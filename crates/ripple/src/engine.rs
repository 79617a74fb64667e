//! Blast radius analysis.
//!
//! The [`BlastRadiusEngine`] owns the extractor and the current dependency
//! graph. It answers "what breaks if I change this symbol?" by combining
//! direct symbol usages with reverse-import traversal, then scoring the result.
//!
//! ## Lifecycle
//!
//! ```text
//! uninitialized --initialize--> initialized --dispose--> uninitialized
//!                                   |    ^
//!                                   +----+ rebuild
//! ```
//!
//! Analysis before `initialize` fails with [`Error::NotInitialized`].

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::RippleConfig;
use crate::error::{Error, Result};
use crate::extractor::SourceExtractor;
use crate::graph::DependencyGraph;
use crate::risk::{DefaultScorePolicy, ImpactCandidate, RiskTables, RiskTagger, ScorePolicy};
use crate::types::{BlastRadiusResult, BuildStats, Cycle, SymbolLocation, TransitiveDependent};

const COMPONENT: &str = "BlastRadiusEngine";

/// State that exists only while initialized.
struct Loaded {
    root: PathBuf,
    graph: Arc<DependencyGraph>,
    stats: BuildStats,
    tagger: RiskTagger,
}

/// Computes blast radius results over a project.
pub struct BlastRadiusEngine {
    extractor: SourceExtractor,
    tables: RiskTables,
    exclude_paths: Vec<String>,
    policy: Box<dyn ScorePolicy>,
    loaded: Option<Loaded>,
}

impl Default for BlastRadiusEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlastRadiusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlastRadiusEngine")
            .field("root", &self.loaded.as_ref().map(|l| &l.root))
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::missing_errors_doc)]
impl BlastRadiusEngine {
    /// Create an uninitialized engine with built-in tables and scoring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractor: SourceExtractor::new(),
            tables: RiskTables::default(),
            exclude_paths: Vec::new(),
            policy: Box::new(DefaultScorePolicy::default()),
            loaded: None,
        }
    }

    /// Create an uninitialized engine using a configuration's risk tables and
    /// excluded paths.
    #[must_use]
    pub fn with_config(config: &RippleConfig) -> Self {
        Self {
            tables: config.risk.clone(),
            exclude_paths: config.exclude_paths.clone(),
            ..Self::new()
        }
    }

    /// Replace the aggregate score policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn ScorePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Load the project under `root` and build its dependency graph.
    ///
    /// Calling this again replaces the previous graph wholesale.
    pub fn initialize(&mut self, root: &Path, project_config: Option<&Path>) -> Result<&BuildStats> {
        self.extractor
            .initialize(root, project_config, &self.exclude_paths)?;

        let mut graph = DependencyGraph::new();
        let stats = graph.build(&mut self.extractor)?;
        let root = self.extractor.project()?.root().to_path_buf();

        info!(
            root = %root.display(),
            files = graph.len(),
            errors = stats.errors.len(),
            "Engine initialized"
        );

        let loaded = self.loaded.insert(Loaded {
            tagger: RiskTagger::new(self.tables.clone()).with_root(root.clone()),
            root,
            graph: Arc::new(graph),
            stats,
        });
        Ok(&loaded.stats)
    }

    /// Dispose, then initialize again. Used after the source tree changes.
    pub fn rebuild(&mut self, root: &Path, project_config: Option<&Path>) -> Result<&BuildStats> {
        self.dispose();
        self.initialize(root, project_config)
    }

    /// Return to the uninitialized state.
    pub fn dispose(&mut self) {
        if self.loaded.take().is_some() {
            debug!("Engine disposed");
        }
        self.extractor.dispose();
    }

    /// Whether a graph is loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.loaded.is_some()
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded
            .as_ref()
            .ok_or_else(|| Error::not_initialized(COMPONENT))
    }

    /// Snapshot of the current graph.
    ///
    /// The snapshot stays valid across later rebuilds.
    pub fn graph(&self) -> Result<Arc<DependencyGraph>> {
        Ok(Arc::clone(&self.loaded()?.graph))
    }

    /// Statistics of the last build.
    pub fn stats(&self) -> Result<&BuildStats> {
        Ok(&self.loaded()?.stats)
    }

    /// Canonical project root.
    pub fn root(&self) -> Result<&Path> {
        Ok(&self.loaded()?.root)
    }

    /// The tagger used for analysis, rooted at the project.
    pub fn tagger(&self) -> Result<&RiskTagger> {
        Ok(&self.loaded()?.tagger)
    }

    /// Normalize a path (relative to the root, or absolute) to a file identity.
    pub fn identity(&self, file: &Path) -> Result<PathBuf> {
        self.loaded()?;
        Ok(self.extractor.project()?.identity(file))
    }

    /// Compute the blast radius of changing `symbol` in `file`.
    ///
    /// A target with no usages and no dependents yields an empty result
    /// scored from the target alone.
    pub fn analyze(&self, file: &Path, symbol: &str, max_depth: usize) -> Result<BlastRadiusResult> {
        let loaded = self.loaded()?;
        let graph = &loaded.graph;
        let tagger = &loaded.tagger;
        let target = self.identity(file)?;

        info!(
            file = %relative_to_root(&loaded.root, &target).display(),
            symbol,
            max_depth,
            "Analyzing blast radius"
        );

        let usages = graph.find_symbol_usages(symbol, &target);
        let transitive = graph.get_transitive_dependents(&target, max_depth);
        debug!(
            usages = usages.len(),
            transitive = transitive.len(),
            "Collected impacted files"
        );

        // Direct users come first so their distance of 1 wins over BFS.
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut candidates = Vec::new();
        let merged = usages
            .into_iter()
            .map(|path| (path, 1))
            .chain(transitive.into_iter().map(|d| (d.path, d.distance)));
        for (path, distance) in merged {
            if !seen.insert(path.clone()) {
                continue;
            }
            let symbols = graph
                .get_node(&path)
                .map(|node| node.export_names())
                .unwrap_or_default();
            candidates.push(ImpactCandidate {
                path,
                symbols,
                distance,
            });
        }

        let mut impacted_files = tagger.enrich_impacted_files(candidates);
        impacted_files.sort_by_key(|f| f.distance);

        let target_tags = tagger.tag_all(&target, &[symbol]);
        let target_score = tagger.calculate_risk_score(&target_tags);
        let total_risk_score = self.policy.total_score(target_score, &impacted_files);

        let mut risk_tags: BTreeSet<_> = target_tags;
        for file in &impacted_files {
            risk_tags.extend(file.risk_tags.iter().copied());
        }

        let touching: HashSet<&Path> = std::iter::once(target.as_path())
            .chain(impacted_files.iter().map(|f| f.path.as_path()))
            .collect();
        let dependency_chain = graph.get_edges_touching(&touching);

        info!(
            symbol,
            impacted = impacted_files.len(),
            score = total_risk_score,
            "Blast radius computed"
        );

        Ok(BlastRadiusResult {
            target_file: target,
            target_symbol: symbol.to_string(),
            impacted_files,
            total_risk_score,
            risk_tags,
            dependency_chain,
            analyzed_at: Utc::now(),
        })
    }

    /// Analyze a file using its first exported symbol, or its file name when
    /// it exports nothing.
    pub fn analyze_file(&self, file: &Path, max_depth: usize) -> Result<BlastRadiusResult> {
        let target = self.identity(file)?;
        let graph = &self.loaded()?.graph;

        let symbol = graph
            .get_node(&target)
            .and_then(|node| node.exports.first())
            .map(|export| export.name.clone())
            .or_else(|| {
                target
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default();

        self.analyze(&target, &symbol, max_depth)
    }

    /// Direct (distance 1) or transitive dependents of a file.
    pub fn dependents(
        &self,
        file: &Path,
        transitive: bool,
        max_depth: usize,
    ) -> Result<Vec<TransitiveDependent>> {
        let target = self.identity(file)?;
        let graph = &self.loaded()?.graph;

        if transitive {
            Ok(graph.get_transitive_dependents(&target, max_depth))
        } else {
            Ok(graph
                .get_dependents(&target)
                .into_iter()
                .map(|path| TransitiveDependent { path, distance: 1 })
                .collect())
        }
    }

    /// Every declaration of `name` in the project.
    pub fn find_symbol_definition(&mut self, name: &str) -> Result<Vec<SymbolLocation>> {
        self.loaded()?;
        self.extractor.find_symbol_definition(name)
    }

    /// Circular imports in the current graph.
    pub fn detect_cycles(&self) -> Result<Vec<Cycle>> {
        Ok(self.loaded()?.graph.detect_cycles())
    }
}

fn relative_to_root<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
