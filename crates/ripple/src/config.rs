//! Ripple configuration file.
//!
//! `.ripple.yaml` in the project root (or a file passed explicitly) tunes
//! traversal depth, project loading, excluded paths and the risk tables.
//! Every field is optional.
//!
//! ```yaml
//! max_depth: 4
//! project: tsconfig.app.json
//! exclude_paths:
//!   - "src/generated/**"
//! risk_threshold: 70
//! risk:
//!   weights:
//!     config: 65
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::DEFAULT_MAX_DEPTH;
use crate::risk::RiskTables;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".ripple.yaml";

/// Project config picked up automatically when present in the root.
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// Default score at or above which the CLI gate fails.
pub const DEFAULT_RISK_THRESHOLD: u8 = 60;

/// Settings loaded from `.ripple.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Traversal bound for transitive dependents
    pub max_depth: usize,
    /// tsconfig-style project file, relative to the project root
    pub project: Option<PathBuf>,
    /// Globs (relative to the root) excluded from discovery
    pub exclude_paths: Vec<String>,
    /// Score at or above which `analyze --fail-above` fails
    pub risk_threshold: u8,
    /// Risk table overrides
    pub risk: RiskTables,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            project: None,
            exclude_paths: Vec::new(),
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            risk: RiskTables::default(),
        }
    }
}

#[allow(clippy::missing_errors_doc)]
impl RippleConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("config file not readable: {}", path.display()),
            ))
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else `.ripple.yaml` under `root`, else defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = root.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            debug!(path = %default_path.display(), "Loading configuration");
            Self::load(&default_path)
        } else {
            debug!(root = %root.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that can't be honored.
    pub fn validate(&self) -> Result<()> {
        if self.risk_threshold > 100 {
            return Err(Error::Config(format!(
                "risk_threshold must be between 0 and 100, got {}",
                self.risk_threshold
            )));
        }
        if let Some((tag, weight)) = self.risk.weights.iter().find(|&(_, &w)| w > 100) {
            return Err(Error::Config(format!(
                "weight for '{tag}' must be between 0 and 100, got {weight}"
            )));
        }
        Ok(())
    }

    /// The project file to load for `root`: the configured one, or
    /// `tsconfig.json` when it exists in the root.
    #[must_use]
    pub fn project_config(&self, root: &Path) -> Option<PathBuf> {
        match &self.project {
            Some(project) => Some(root.join(project)),
            None => {
                let tsconfig = root.join(TSCONFIG_FILE_NAME);
                tsconfig.is_file().then_some(tsconfig)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskTag;
    use std::fs;

    #[test]
    fn defaults_when_no_file() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let config = RippleConfig::discover(dir.path(), None).expect("should use defaults");

        assert_eq!(config, RippleConfig::default());
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.risk_threshold, 60);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "max_depth: 3\nexclude_paths:\n  - \"gen/**\"\nrisk:\n  weights:\n    test: 45\n",
        )
        .expect("should write config");

        let config = RippleConfig::discover(dir.path(), None).expect("config should load");

        assert_eq!(config.max_depth, 3);
        assert_eq!(config.exclude_paths, vec!["gen/**"]);
        assert_eq!(config.risk_threshold, 60);
        assert_eq!(config.risk.weight(RiskTag::Test), 45);
        assert_eq!(config.risk.weight(RiskTag::Auth), 90);
    }

    #[test]
    fn explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let result = RippleConfig::discover(dir.path(), Some(&dir.path().join("nope.yaml")));

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn invalid_yaml_is_yaml_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "max_depth: [not, a, number]").expect("should write config");

        assert!(matches!(RippleConfig::load(&path), Err(Error::Yaml(_))));
    }

    #[test]
    fn out_of_range_values_are_config_errors() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("c.yaml");
        fs::write(&path, "risk_threshold: 150").expect("should write config");

        assert!(matches!(RippleConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = RippleConfig {
            max_depth: 7,
            project: Some(PathBuf::from("tsconfig.app.json")),
            ..RippleConfig::default()
        };

        config.save(&path).expect("save should succeed");
        let loaded = RippleConfig::load(&path).expect("load should succeed");

        assert_eq!(loaded, config);
    }

    #[test]
    fn project_config_prefers_explicit_then_tsconfig() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = RippleConfig::default();

        assert_eq!(config.project_config(dir.path()), None);

        fs::write(dir.path().join(TSCONFIG_FILE_NAME), "{}").expect("should write tsconfig");
        assert_eq!(
            config.project_config(dir.path()),
            Some(dir.path().join(TSCONFIG_FILE_NAME))
        );

        let explicit = RippleConfig {
            project: Some(PathBuf::from("tsconfig.lib.json")),
            ..RippleConfig::default()
        };
        assert_eq!(
            explicit.project_config(dir.path()),
            Some(dir.path().join("tsconfig.lib.json"))
        );
    }
}
