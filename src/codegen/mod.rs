//! The code-generation pipeline.
//!
//! ```text
//! records ──► SkeletonRenderer ──► skeleton text ──► parse_skeleton ──► syn::File
//!                                                                         │
//!                          license files ──► inject_licenses ◄────────────┘
//!                                                  │
//!                                   print_tree ◄───┘ ──► write_output
//! ```
//!
//! Untrusted license bytes only ever enter the output as `syn` string literal
//! nodes built by `proc_macro2`, never through the template. The skeleton shape
//! produced by [`skeleton`] and the slot matcher in [`inject`] live side by side
//! in this module and change together.
//!
//! The pipeline is synchronous and deterministic: the same records and license
//! contents always produce byte-identical output.

pub mod inject;
pub mod parser;
pub mod printer;
pub mod skeleton;

use anyhow::Result;
use tracing::info;

pub use inject::{FsLicenseReader, LicenseReader, inject_licenses};
pub use parser::{find_function, parse_skeleton};
pub use printer::{GENERATED_BANNER, print_tree, write_output};
pub use skeleton::{SkeletonRenderer, validate_identifiers};

use crate::models::{DependencyRecord, GenerationConfig};

/// Produce the complete generated module as text.
///
/// Nothing is written; on error no partial output exists anywhere.
pub fn generate(
    records: &[DependencyRecord],
    config: &GenerationConfig,
    reader: &dyn LicenseReader,
) -> Result<String> {
    let skeleton = SkeletonRenderer::new()?.render(records, config)?;
    let mut tree = parse_skeleton(&skeleton)?;
    let filled = inject_licenses(&mut tree, &config.function_name, records, reader)?;
    let output = print_tree(&tree);

    info!("Embedded {} license texts into {}()", filled, config.function_name);
    Ok(output)
}

/// Generate the module from files on disk and write it to the configured destination.
pub fn run(records: &[DependencyRecord], config: &GenerationConfig) -> Result<()> {
    let output = generate(records, config, &FsLicenseReader)?;
    write_output(&output, &config.destination)
}
