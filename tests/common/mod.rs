//! Common test utilities and fixtures for licensed integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use licensed_cli::test_utils::{MetadataFixture, init_test_logging};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the metadata file written by [`TestProject::write_metadata`].
pub const METADATA_FILE: &str = "metadata.json";

/// A temporary cargo project with a `vendor/` directory.
///
/// Layout:
///
/// ```text
/// <temp>/project/
///   Cargo.toml          [package] name = "demo-app"
///   src/main.rs
///   vendor/<name>/...
///   metadata.json       (after write_metadata)
/// ```
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    metadata: MetadataFixture,
}

impl TestProject {
    /// Create a project without dependencies.
    pub fn new() -> Result<Self> {
        init_test_logging(None);
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(project_dir.join("src"))?;
        fs::create_dir_all(project_dir.join("vendor"))?;

        fs::write(
            project_dir.join("Cargo.toml"),
            "[package]\nname = \"demo-app\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
        )?;
        fs::write(project_dir.join("src/main.rs"), "fn main() {}\n")?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            metadata: MetadataFixture::new("demo-app"),
        })
    }

    /// Root of the project.
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Register a crates.io dependency in the metadata and vendor it with the
    /// given files.
    pub fn add_dependency(&mut self, name: &str, version: &str, files: &[(&str, &[u8])]) -> Result<()> {
        self.metadata = self.metadata.clone().registry_package(name, version);
        self.vendor_files(name, files)
    }

    /// Create files under `vendor/<dir>` without touching the metadata.
    pub fn vendor_files(&self, dir: &str, files: &[(&str, &[u8])]) -> Result<()> {
        let vendor_dir = self.project_dir.join("vendor").join(dir);
        fs::create_dir_all(&vendor_dir)?;
        for (file, content) in files {
            fs::write(vendor_dir.join(file), content)
                .with_context(|| format!("Failed to write vendor file {dir}/{file}"))?;
        }
        Ok(())
    }

    /// Write the accumulated `cargo metadata` JSON to [`METADATA_FILE`].
    pub fn write_metadata(&self) -> Result<()> {
        self.metadata.write_to(&self.project_dir.join(METADATA_FILE))?;
        Ok(())
    }

    /// Write a file relative to the project root.
    pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.project_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Read a file relative to the project root.
    pub fn read_file(&self, rel: &str) -> Result<String> {
        fs::read_to_string(self.project_dir.join(rel))
            .with_context(|| format!("Failed to read {rel}"))
    }

    /// A `licensed` command running in the project root, with no arguments.
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("licensed").expect("licensed binary is built");
        cmd.current_dir(&self.project_dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
        cmd
    }

    /// A `licensed` command running in the project root with `--metadata`.
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.args(["--metadata", METADATA_FILE]);
        cmd
    }

    /// Run `licensed` with extra arguments and capture the result.
    pub fn run_licensed(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.command().args(args).output().context("Failed to run licensed")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Captured output of one `licensed` run.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    /// Assert the command failed with exit status 1
    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        assert_eq!(self.code, Some(1), "Stderr: {}", self.stderr);
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
