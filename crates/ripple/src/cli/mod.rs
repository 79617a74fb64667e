//! CLI command implementations.

mod display;

pub mod analyze;
pub mod cycles;
pub mod definition;
pub mod dependents;
pub mod stats;
pub mod tags;

use std::path::{Path, PathBuf};

use ripple::{BlastRadiusEngine, RippleConfig};

/// Project root and configuration shared by every command.
pub struct Context {
    /// Project root as given on the command line
    pub workspace: PathBuf,
    /// Loaded (or default) configuration
    pub config: RippleConfig,
}

impl Context {
    /// Load the configuration for `workspace`.
    pub fn load(workspace: &Path, config_path: Option<&Path>) -> Result<Self, ripple::Error> {
        let config = RippleConfig::discover(workspace, config_path)?;
        Ok(Self {
            workspace: workspace.to_path_buf(),
            config,
        })
    }

    /// Build an engine over the project, loading `tsconfig.json` when present.
    pub fn engine(&self) -> Result<BlastRadiusEngine, ripple::Error> {
        let mut engine = BlastRadiusEngine::with_config(&self.config);
        let project = self.config.project_config(&self.workspace);
        let stats = engine.initialize(&self.workspace, project.as_deref())?;

        if !stats.errors.is_empty() {
            tracing::warn!(
                count = stats.errors.len(),
                "Some files could not be parsed; run `ripple stats` for details"
            );
        }

        Ok(engine)
    }

    /// Depth from the command line, or the configured default.
    pub fn depth(&self, depth: Option<usize>) -> usize {
        depth.unwrap_or(self.config.max_depth)
    }
}
