//! Sources of the third-party dependency list.
//!
//! Both sources produce the same thing, an ordered list of
//! [`DependencyRecord`]s without license paths, from the JSON emitted by
//! `cargo metadata --format-version 1`:
//!
//! - [`CargoMetadataSource`] runs cargo in the project root
//! - [`MetadataFileSource`] reads JSON captured earlier, for offline builds

pub mod command;
pub mod metadata;

use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;

use crate::models::DependencyRecord;
use command::CargoCommand;

pub use metadata::{parse_metadata, records_from_json, third_party_records};

/// Supplies the ordered dependency identifiers for one run.
pub trait DependencySource {
    /// Load the records. Any failure is fatal for the run.
    fn load(&self) -> impl Future<Output = Result<Vec<DependencyRecord>>> + Send;
}

/// Runs `cargo metadata` in the project root.
#[derive(Debug, Clone)]
pub struct CargoMetadataSource {
    root: PathBuf,
    versioned_dirs: bool,
}

impl CargoMetadataSource {
    pub fn new(root: impl Into<PathBuf>, versioned_dirs: bool) -> Self {
        Self {
            root: root.into(),
            versioned_dirs,
        }
    }
}

impl DependencySource for CargoMetadataSource {
    async fn load(&self) -> Result<Vec<DependencyRecord>> {
        let json = CargoCommand::new()
            .args(["metadata", "--format-version", "1"])
            .current_dir(&self.root)
            .execute_stdout()
            .await?;
        records_from_json(&json, self.versioned_dirs)
    }
}

/// Reads `cargo metadata` JSON from a file.
#[derive(Debug, Clone)]
pub struct MetadataFileSource {
    path: PathBuf,
    versioned_dirs: bool,
}

impl MetadataFileSource {
    pub fn new(path: impl Into<PathBuf>, versioned_dirs: bool) -> Self {
        Self {
            path: path.into(),
            versioned_dirs,
        }
    }
}

impl DependencySource for MetadataFileSource {
    async fn load(&self) -> Result<Vec<DependencyRecord>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read metadata file: {}", self.path.display()))?;
        records_from_json(&json, self.versioned_dirs)
    }
}
