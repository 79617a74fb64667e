//! Risk tagging and scoring.
//!
//! The [`RiskTagger`] classifies file paths and symbol names into
//! [`RiskTag`]s by substring matching against [`RiskTables`], and turns tag
//! sets into 0-100 scores. It holds no state beyond its tables.

mod policy;
mod tables;

pub use policy::{DefaultScorePolicy, ScorePolicy};
pub use tables::{PatternRule, RiskTables};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::types::{ImpactedFile, RiskLevel, RiskTag};

/// A file reached by analysis, before risk assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactCandidate {
    /// File identity
    pub path: PathBuf,
    /// Names the file exports
    pub symbols: Vec<String>,
    /// Hop count from the target file
    pub distance: usize,
}

/// Pattern-based risk classifier.
#[derive(Debug, Clone)]
pub struct RiskTagger {
    tables: RiskTables,
    root: Option<PathBuf>,
}

impl Default for RiskTagger {
    fn default() -> Self {
        Self::new(RiskTables::default())
    }
}

impl RiskTagger {
    /// Create a tagger over the given tables.
    #[must_use]
    pub fn new(tables: RiskTables) -> Self {
        Self {
            tables: tables.normalized(),
            root: None,
        }
    }

    /// Tag paths relative to `root`, so directories above the project don't
    /// contribute tags.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The tables in use.
    #[must_use]
    pub fn tables(&self) -> &RiskTables {
        &self.tables
    }

    /// Tags whose path pattern occurs in the lowercase, forward-slash path.
    #[must_use]
    pub fn tag_file(&self, path: &Path) -> BTreeSet<RiskTag> {
        let path = self
            .root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        let normalized = path.to_string_lossy().replace('\\', "/").to_lowercase();

        self.tables
            .path_patterns
            .iter()
            .filter(|rule| normalized.contains(rule.pattern.as_str()))
            .map(|rule| rule.tag)
            .collect()
    }

    /// Tags whose keyword occurs in any lowercase symbol name.
    #[must_use]
    pub fn tag_symbols<S: AsRef<str>>(&self, names: &[S]) -> BTreeSet<RiskTag> {
        let mut tags = BTreeSet::new();
        for name in names {
            let lower = name.as_ref().to_lowercase();
            tags.extend(
                self.tables
                    .symbol_keywords
                    .iter()
                    .filter(|rule| lower.contains(rule.pattern.as_str()))
                    .map(|rule| rule.tag),
            );
        }
        tags
    }

    /// Union of [`tag_file`](Self::tag_file) and [`tag_symbols`](Self::tag_symbols).
    #[must_use]
    pub fn tag_all<S: AsRef<str>>(&self, path: &Path, names: &[S]) -> BTreeSet<RiskTag> {
        let mut tags = self.tag_file(path);
        tags.extend(self.tag_symbols(names));
        tags
    }

    /// Heaviest tag's weight plus a flat bonus per additional tag, capped at 100.
    ///
    /// Empty tag sets score 0.
    #[must_use]
    pub fn calculate_risk_score(&self, tags: &BTreeSet<RiskTag>) -> u8 {
        let Some(max_weight) = tags.iter().map(|&t| self.tables.weight(t)).max() else {
            return 0;
        };
        let extra = u32::try_from(tags.len() - 1).unwrap_or(u32::MAX);
        let score = u32::from(max_weight)
            .saturating_add(extra.saturating_mul(u32::from(self.tables.extra_tag_bonus)));
        u8::try_from(score.min(100)).unwrap_or(100)
    }

    /// Score after removing the per-hop decay, floored at 0.
    #[must_use]
    pub fn adjusted_score(&self, score: u8, distance: usize) -> u8 {
        let decay = usize::from(self.tables.distance_decay).saturating_mul(distance);
        score.saturating_sub(u8::try_from(decay).unwrap_or(u8::MAX))
    }

    /// Attach tags and a distance-decayed risk level to each candidate.
    #[must_use]
    pub fn enrich_impacted_files(&self, candidates: Vec<ImpactCandidate>) -> Vec<ImpactedFile> {
        candidates
            .into_iter()
            .map(|candidate| {
                let risk_tags = self.tag_all(&candidate.path, &candidate.symbols);
                let score = self.calculate_risk_score(&risk_tags);
                let adjusted = self.adjusted_score(score, candidate.distance);
                ImpactedFile {
                    path: candidate.path,
                    symbols: candidate.symbols,
                    risk_level: RiskLevel::from_score(adjusted),
                    distance: candidate.distance,
                    risk_tags,
                }
            })
            .collect()
    }
}
