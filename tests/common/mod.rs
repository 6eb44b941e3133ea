//! Common test utilities for Gantry integration tests.
//!
//! Provides `TestEnv`, an isolated project directory with helpers to write
//! fixture files and run the gantry binary against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a gantry CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp project directory
pub struct TestEnv {
    project: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project: TempDir::new().expect("failed to create temp project dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_gantry")),
        }
    }

    pub fn root(&self) -> &Path {
        self.project.path()
    }

    /// Project root as a forward-slash string, for config and facade ids
    pub fn root_str(&self) -> String {
        self.root().to_string_lossy().replace('\\', "/")
    }

    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(self.root())
            .output()
            .expect("failed to run gantry binary");
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("public/build/.gantry/entrypoints.json")
    }

    pub fn read_manifest(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.manifest_path()).expect("manifest file missing");
        serde_json::from_str(&text).expect("manifest is not valid JSON")
    }
}
