//! Project layout discovery: the vendor root and the crate being generated into.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::VENDOR_DIR;
use crate::core::LicensedError;

/// Walk up from `start` to the first directory that contains `vendor/`.
///
/// # Errors
///
/// [`LicensedError::ProjectRootNotFound`] when no ancestor has a vendor directory.
pub fn find_project_root(start: &Path) -> Result<PathBuf, LicensedError> {
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        if current.join(VENDOR_DIR).is_dir() {
            tracing::debug!("Project root: {}", current.display());
            return Ok(current);
        }

        if !current.pop() {
            return Err(LicensedError::ProjectRootNotFound {
                start: start.display().to_string(),
                marker: VENDOR_DIR.to_string(),
            });
        }
    }
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<PackageSection>,
    lib: Option<TargetSection>,
    #[serde(default)]
    bin: Vec<TargetSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TargetSection {
    path: Option<PathBuf>,
}

impl CargoManifest {
    /// Directories holding the package's target roots, `src/` first.
    fn source_dirs(&self, manifest_dir: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![manifest_dir.join("src")];
        let declared = self.lib.iter().chain(&self.bin).filter_map(|target| target.path.as_ref());
        for path in declared {
            if let Some(parent) = manifest_dir.join(path).parent() {
                let parent = parent.to_path_buf();
                if !dirs.contains(&parent) {
                    dirs.push(parent);
                }
            }
        }
        dirs
    }
}

/// Determine the name of the crate the output in `dir` belongs to.
///
/// The nearest `Cargo.toml` at or above `dir` must declare `[package].name`.
/// `dir` itself should contain a `.rs` file that parses as Rust; when it does
/// not (a package root, for instance), the package's `src/` directory and the
/// directories of its `[lib]` and `[[bin]]` paths are tried instead. The
/// returned name is the one used in paths (`-` replaced by `_`).
pub fn detect_target_crate(dir: &Path) -> Result<String> {
    let undetectable = |reason: &str| LicensedError::TargetCrateUndetectable {
        dir: dir.display().to_string(),
        reason: reason.to_string(),
    };

    if !dir.is_dir() {
        return Err(undetectable("directory does not exist").into());
    }

    let manifest_path = find_manifest(dir).ok_or_else(|| undetectable("no Cargo.toml above it"))?;
    let content = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest: CargoManifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    let package = manifest
        .package
        .as_ref()
        .ok_or_else(|| undetectable("nearest Cargo.toml has no [package] section"))?;

    if !has_parseable_source(dir)? {
        let manifest_dir = manifest_path.parent().unwrap_or(dir);
        let mut found = None;
        for candidate in manifest.source_dirs(manifest_dir) {
            if candidate.is_dir() && has_parseable_source(&candidate)? {
                found = Some(candidate);
                break;
            }
        }
        let Some(source_dir) = found else {
            return Err(undetectable("no Rust source file that parses").into());
        };
        tracing::debug!(
            "No Rust sources in {}, using package sources in {}",
            dir.display(),
            source_dir.display()
        );
    }

    let crate_name = package.name.replace('-', "_");
    if syn::parse_str::<syn::Ident>(&crate_name).is_err() {
        return Err(undetectable("package name is not a valid crate name").into());
    }

    tracing::debug!("Generating into crate {} ({})", crate_name, manifest_path.display());
    Ok(crate_name)
}

fn has_parseable_source(dir: &Path) -> Result<bool> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut sources: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "rs") && path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    for path in sources {
        let Ok(content) = fs::read_to_string(&path) else {
            tracing::trace!("Skipping unreadable source {}", path.display());
            continue;
        };
        if syn::parse_file(&content).is_ok() {
            return Ok(true);
        }
        tracing::trace!("Skipping unparseable source {}", path.display());
    }
    Ok(false)
}

fn find_manifest(dir: &Path) -> Option<PathBuf> {
    dir.ancestors().map(|ancestor| ancestor.join("Cargo.toml")).find(|path| path.is_file())
}
