//! Shared helpers for ripple integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use ripple::BlastRadiusEngine;
use tempfile::TempDir;

/// Create a temporary project with the given files.
pub fn workspace_with_files(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("should create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("should create parent dirs");
        }
        fs::write(&full_path, content).expect("should write file");
    }

    dir
}

/// An engine initialized over `dir` with default settings.
pub fn engine_for(dir: &TempDir) -> BlastRadiusEngine {
    let mut engine = BlastRadiusEngine::new();
    engine
        .initialize(dir.path(), None)
        .expect("initialize should succeed");
    engine
}

/// Identity of a project-relative path, as the engine reports it.
pub fn identity(engine: &BlastRadiusEngine, relative: &str) -> PathBuf {
    engine
        .identity(std::path::Path::new(relative))
        .expect("engine should be initialized")
}
