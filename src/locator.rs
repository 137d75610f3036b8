//! License file discovery in the vendor directory.
//!
//! For a dependency `name`, candidates are the files matching
//! `<vendor>/<name>/<pattern>` (default pattern `LICENSE*`). When several files
//! match, selection is deterministic:
//!
//! 1. a file named exactly `LICENSE`, if present;
//! 2. otherwise the first match in lexical order of file names.
//!
//! For a typical dual-licensed crate shipping `LICENSE-APACHE` and `LICENSE-MIT`,
//! this picks `LICENSE-APACHE`.

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::constants::PREFERRED_LICENSE_FILE;
use crate::core::LicensedError;
use crate::models::DependencyRecord;

/// Finds the license file of a vendored dependency.
#[derive(Debug, Clone)]
pub struct LicenseLocator {
    pattern: Pattern,
}

impl LicenseLocator {
    /// Create a locator for a file-name glob such as `LICENSE*`.
    ///
    /// # Errors
    ///
    /// [`LicensedError::InvalidLicensePattern`] if the glob is malformed or does
    /// not name files directly inside the dependency directory (path separators
    /// and `..` are rejected).
    pub fn new(pattern_str: &str) -> Result<Self, LicensedError> {
        let invalid = |reason: String| LicensedError::InvalidLicensePattern {
            pattern: pattern_str.to_string(),
            reason,
        };

        if pattern_str.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }
        if pattern_str.contains(['/', '\\']) || pattern_str.contains("..") {
            return Err(invalid("pattern must match file names, not paths".to_string()));
        }
        let pattern = Pattern::new(pattern_str).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            pattern,
        })
    }

    /// Return the license file for `name` under `vendor_root`, if any.
    ///
    /// A missing dependency directory is not an error here; the record simply
    /// gets no license file and generation fails later with a precise message.
    pub fn locate(&self, vendor_root: &Path, name: &str) -> Result<Option<PathBuf>> {
        let dir = vendor_root.join(name);
        if !dir.is_dir() {
            trace!("No vendor directory {}", dir.display());
            return Ok(None);
        }

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to find license candidates for {name}"))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to find license candidates for {name}"))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                trace!("Skipping non-UTF-8 file name in {}", dir.display());
                continue;
            };
            let path = entry.path();
            if self.pattern.matches_with(file_name, options) && path.is_file() {
                candidates.push(path);
            }
        }
        candidates.sort();

        Ok(pick_candidate(candidates))
    }

    /// Attach a license path to every record that has one.
    pub fn enrich(&self, vendor_root: &Path, records: &mut [DependencyRecord]) -> Result<()> {
        for record in records.iter_mut() {
            record.license_path = self.locate(vendor_root, &record.name)?;
            match &record.license_path {
                Some(path) => debug!("License of {} is {}", record.name, path.display()),
                None => debug!(
                    "No file matching '{}' in {}",
                    self.pattern.as_str(),
                    vendor_root.join(&record.name).display()
                ),
            }
        }
        Ok(())
    }
}

fn pick_candidate(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    if let Some(exact) = candidates
        .iter()
        .find(|path| path.file_name().is_some_and(|file_name| file_name == PREFERRED_LICENSE_FILE))
    {
        return Some(exact.clone());
    }
    candidates.into_iter().next()
}
