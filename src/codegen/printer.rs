//! Printing of the finished tree and writing it to its destination.

use std::io::Write;

use anyhow::{Context, Result};
use syn::File;

use crate::core::LicensedError;
use crate::models::Destination;
use crate::utils::fs::atomic_write;

/// First line of every generated module.
pub const GENERATED_BANNER: &str = "// @generated by licensed. Do not edit by hand.";

/// Serialize the tree with `prettyplease`.
///
/// The same tree always prints to the same bytes.
pub fn print_tree(file: &File) -> String {
    format!("{GENERATED_BANNER}\n\n{}", prettyplease::unparse(file))
}

/// Write generated source to `destination`.
///
/// Stdout leaves the filesystem untouched. A file destination is replaced via a
/// temporary sibling and a rename, so an interrupted write never leaves a
/// truncated module behind.
pub fn write_output(text: &str, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write generated module to stdout")?;
        }
        Destination::File(path) => {
            atomic_write(path, text.as_bytes()).map_err(|e| LicensedError::OutputWriteFailed {
                path: path.display().to_string(),
                reason: format!("{e:#}"),
            })?;
        }
    }

    tracing::debug!("Wrote {} bytes to {}", text.len(), destination);
    Ok(())
}
