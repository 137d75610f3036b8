//! File system helpers.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// The content goes to a temporary file in the target's directory, is synced to
/// disk, and is then renamed over the target. Readers see either the old file
/// or the complete new one. The parent directory must already exist.
///
/// # Examples
///
/// ```rust,no_run
/// use licensed_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("src/licenses_generated.rs"), b"pub fn license_infos() {}")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
