//! Shared data models for licensed
//!
//! These are the plain-data values passed between the collaborators and the
//! generation pipeline. Nothing here performs I/O.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::STDOUT_SENTINEL;

/// A single third-party dependency and its discovered license file.
///
/// Records are created by a [`DependencySource`](crate::deps::DependencySource),
/// enriched once by the [`LicenseLocator`](crate::locator::LicenseLocator) and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Canonical identifier: the dependency's directory name under `vendor/`.
    ///
    /// Unique within one run. Used both as lookup key and as the embedded
    /// `package` value.
    pub name: String,

    /// License file discovered for this dependency, if any.
    pub license_path: Option<PathBuf>,
}

impl DependencyRecord {
    /// Create a record with no license file attached yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            license_path: None,
        }
    }

    /// Attach a license file path.
    #[must_use]
    pub fn with_license(mut self, path: impl Into<PathBuf>) -> Self {
        self.license_path = Some(path.into());
        self
    }
}

/// Where the generated module is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to the process's standard output; no file is touched.
    Stdout,
    /// Create or replace this file.
    File(PathBuf),
}

impl Destination {
    /// Interpret a command-line value, where `-` selects standard output.
    pub fn from_arg(value: &str) -> Self {
        if value == STDOUT_SENTINEL {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Directory whose sources determine the target crate.
    ///
    /// For a file destination this is the file's parent (or `cwd` for a bare
    /// file name); for stdout it is `cwd` itself.
    pub fn directory(&self, cwd: &Path) -> PathBuf {
        match self {
            Self::Stdout => cwd.to_path_buf(),
            Self::File(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                };
                match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => cwd.to_path_buf(),
                }
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable parameters of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Output destination.
    pub destination: Destination,
    /// Name of the generated accessor function.
    pub function_name: String,
    /// Name of the generated record type.
    pub type_name: String,
    /// Crate the module is generated into, detected from the destination directory.
    pub crate_name: String,
}
