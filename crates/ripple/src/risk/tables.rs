//! Risk classification tables.
//!
//! Weights and naming patterns are data, not logic, so they can be tuned from
//! the configuration file. [`RiskTables::default`] holds the built-in values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RiskTag;

/// A substring pattern and the tag it assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Lowercase substring to look for
    pub pattern: String,
    /// Tag assigned on a match
    pub tag: RiskTag,
}

impl PatternRule {
    fn new(pattern: &str, tag: RiskTag) -> Self {
        Self {
            pattern: pattern.to_string(),
            tag,
        }
    }
}

/// Tunable inputs of the risk tagger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskTables {
    /// Per-tag weight overrides; tags missing here use [`RiskTag::base_weight`]
    pub weights: BTreeMap<RiskTag, u8>,
    /// Matched against lowercase, forward-slash file paths
    pub path_patterns: Vec<PatternRule>,
    /// Matched against lowercase symbol names
    pub symbol_keywords: Vec<PatternRule>,
    /// Points added for each tag beyond the heaviest one
    pub extra_tag_bonus: u8,
    /// Points removed per hop of distance from the changed file
    pub distance_decay: u8,
}

impl RiskTables {
    /// Weight of a tag, honoring overrides.
    #[must_use]
    pub fn weight(&self, tag: RiskTag) -> u8 {
        self.weights
            .get(&tag)
            .copied()
            .unwrap_or_else(|| tag.base_weight())
    }

    /// Copy with every pattern lowercased.
    #[must_use]
    pub(crate) fn normalized(mut self) -> Self {
        for rule in self
            .path_patterns
            .iter_mut()
            .chain(self.symbol_keywords.iter_mut())
        {
            rule.pattern = rule.pattern.to_lowercase();
        }
        self
    }
}

impl Default for RiskTables {
    fn default() -> Self {
        use RiskTag::{Api, Auth, Config, Database, Migration, Payment, Security, State, Test, Validation};

        let path_patterns = [
            ("auth", Auth),
            ("login", Auth),
            ("session", Auth),
            ("token", Auth),
            ("db", Database),
            ("database", Database),
            ("repository", Database),
            ("schema", Database),
            ("prisma", Database),
            ("migration", Migration),
            ("valid", Validation),
            ("sanitiz", Validation),
            ("api", Api),
            ("route", Api),
            ("endpoint", Api),
            ("controller", Api),
            ("state", State),
            ("store", State),
            ("redux", State),
            ("context", State),
            ("security", Security),
            ("encrypt", Security),
            ("permission", Security),
            ("payment", Payment),
            ("billing", Payment),
            ("stripe", Payment),
            ("config", Config),
            ("env", Config),
            ("setting", Config),
            ("test", Test),
            ("spec", Test),
            ("__test__", Test),
        ];

        let symbol_keywords = [
            ("auth", Auth),
            ("login", Auth),
            ("password", Auth),
            ("token", Auth),
            ("session", Auth),
            ("query", Database),
            ("insert", Database),
            ("update", Database),
            ("delete", Database),
            ("schema", Database),
            ("validate", Validation),
            ("sanitize", Validation),
            ("parse", Validation),
            ("fetch", Api),
            ("request", Api),
            ("response", Api),
            ("endpoint", Api),
            ("state", State),
            ("dispatch", State),
            ("reducer", State),
            ("encrypt", Security),
            ("decrypt", Security),
            ("hash", Security),
            ("permission", Security),
            ("payment", Payment),
            ("charge", Payment),
            ("config", Config),
            ("migrate", Migration),
        ];

        Self {
            weights: RiskTag::ALL
                .iter()
                .map(|&tag| (tag, tag.base_weight()))
                .collect(),
            path_patterns: path_patterns
                .iter()
                .map(|&(pattern, tag)| PatternRule::new(pattern, tag))
                .collect(),
            symbol_keywords: symbol_keywords
                .iter()
                .map(|&(pattern, tag)| PatternRule::new(pattern, tag))
                .collect(),
            extra_tag_bonus: 3,
            distance_decay: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_tag_constants() {
        let tables = RiskTables::default();

        for tag in RiskTag::ALL {
            assert_eq!(tables.weight(tag), tag.base_weight());
        }
        assert_eq!(tables.weight(RiskTag::Security), 95);
        assert_eq!(tables.weight(RiskTag::Test), 20);
    }

    #[test]
    fn missing_weight_falls_back_to_base() {
        let tables = RiskTables {
            weights: BTreeMap::from([(RiskTag::Test, 40)]),
            ..RiskTables::default()
        };

        assert_eq!(tables.weight(RiskTag::Test), 40);
        assert_eq!(tables.weight(RiskTag::Auth), 90);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "distance_decay: 10\nweights:\n  config: 75\n";

        let tables: RiskTables = serde_yaml::from_str(yaml).expect("tables should deserialize");

        assert_eq!(tables.distance_decay, 10);
        assert_eq!(tables.weight(RiskTag::Config), 75);
        assert_eq!(tables.weight(RiskTag::Payment), 95);
        assert_eq!(tables.extra_tag_bonus, 3);
        assert_eq!(tables.path_patterns, RiskTables::default().path_patterns);
    }

    #[test]
    fn normalized_lowercases_patterns() {
        let tables = RiskTables {
            path_patterns: vec![PatternRule::new("Checkout", RiskTag::Payment)],
            symbol_keywords: vec![PatternRule::new("CHARGE", RiskTag::Payment)],
            ..RiskTables::default()
        }
        .normalized();

        assert_eq!(tables.path_patterns[0].pattern, "checkout");
        assert_eq!(tables.symbol_keywords[0].pattern, "charge");
    }
}
