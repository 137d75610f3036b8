//! Command-line interface for licensed.
//!
//! `licensed` has no subcommands. One invocation resolves the project layout,
//! loads the third-party dependency list, finds each dependency's license file
//! in `vendor/` and writes a Rust module embedding all license texts.
//!
//! # Usage
//!
//! ```bash
//! # Write src/licenses_generated.rs for the crate in the current project
//! cargo vendor
//! licensed --output src/licenses_generated.rs
//!
//! # Custom names, printed to stdout
//! licensed -o - --func third_party_licenses --type ThirdPartyLicense
//!
//! # Offline: use metadata captured earlier
//! cargo metadata --format-version 1 > metadata.json
//! licensed --metadata metadata.json -o src/licenses_generated.rs
//! ```
//!
//! # Processing order
//!
//! 1. Function and type names and the license pattern are validated before any
//!    file is read.
//! 2. The project root (the directory holding `vendor/`) is resolved once,
//!    from the working directory and the flags.
//! 3. The dependency list comes from `cargo metadata` or from `--metadata`.
//! 4. The target crate is detected from the destination directory, falling
//!    back to the package's own sources when that directory holds none.
//! 5. License files are located, then the [`codegen`](crate::codegen) pipeline
//!    produces and writes the module.
//!
//! Any failure aborts the run; the destination is never partially written.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::codegen;
use crate::constants::{
    DEFAULT_FUNCTION_NAME, DEFAULT_LICENSE_PATTERN, DEFAULT_OUTPUT_PATH, DEFAULT_TYPE_NAME,
    VENDOR_DIR,
};
use crate::core::LicensedError;
use crate::deps::{CargoMetadataSource, DependencySource, MetadataFileSource};
use crate::locator::LicenseLocator;
use crate::models::{DependencyRecord, Destination, GenerationConfig};
use crate::project::{detect_target_crate, find_project_root};

/// Runtime configuration derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Stdout is reserved for the generated module when `-o -` is used. A
    /// subscriber installed earlier (by tests, for example) is left in place.
    pub fn init_logging(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Generate a Rust module embedding the license texts of vendored dependencies.
#[derive(Parser, Debug)]
#[command(
    name = "licensed",
    about = "Embed third-party license texts into a generated Rust module",
    version,
    long_about = "licensed reads the dependency list from cargo metadata, finds each dependency's \
                  license file under vendor/, and writes a Rust module whose accessor function \
                  returns every (package, license text) pair."
)]
pub struct Cli {
    /// Destination file, or `-` for standard output.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: String,

    /// Name of the generated accessor function.
    #[arg(long = "func", default_value = DEFAULT_FUNCTION_NAME)]
    function_name: String,

    /// Name of the generated record type.
    #[arg(long = "type", default_value = DEFAULT_TYPE_NAME)]
    type_name: String,

    /// Project root containing `vendor/`.
    ///
    /// Defaults to the nearest ancestor of the working directory that has a
    /// `vendor/` directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Read `cargo metadata --format-version 1` output from this file instead
    /// of running cargo.
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Glob matched against file names in each vendored crate.
    #[arg(long, default_value = DEFAULT_LICENSE_PATTERN)]
    license_pattern: String,

    /// Vendor directories are always named `<name>-<version>`, as produced by
    /// `cargo vendor --versioned-dirs`.
    #[arg(long)]
    versioned_dirs: bool,

    /// Enable debug logging. Mutually exclusive with `--quiet`.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors. Mutually exclusive with `--verbose`.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Run with the configuration derived from the flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
        }
    }

    /// Run with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        codegen::validate_identifiers(&self.function_name, &self.type_name)?;
        let locator = LicenseLocator::new(&self.license_pattern)?;

        let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
        let root = self.resolve_root(&cwd)?;

        let mut records = self.load_records(&cwd, &root).await?;
        if records.is_empty() {
            tracing::warn!("No third-party dependencies found; generating an empty list");
        }

        let destination = Destination::from_arg(&self.output);
        let crate_name = detect_target_crate(&destination.directory(&cwd))?;
        locator.enrich(&root.join(VENDOR_DIR), &mut records)?;

        let config = GenerationConfig {
            destination,
            function_name: self.function_name,
            type_name: self.type_name,
            crate_name,
        };
        codegen::run(&records, &config)?;

        tracing::info!("Wrote license module for {} to {}", config.crate_name, config.destination);
        Ok(())
    }

    fn resolve_root(&self, cwd: &Path) -> Result<PathBuf, LicensedError> {
        match &self.root {
            Some(root) => {
                let root = cwd.join(root);
                if root.join(VENDOR_DIR).is_dir() {
                    Ok(root)
                } else {
                    Err(LicensedError::ProjectRootNotFound {
                        start: root.display().to_string(),
                        marker: VENDOR_DIR.to_string(),
                    })
                }
            }
            None => find_project_root(cwd),
        }
    }

    async fn load_records(&self, cwd: &Path, root: &Path) -> Result<Vec<DependencyRecord>> {
        match &self.metadata {
            Some(path) => MetadataFileSource::new(cwd.join(path), self.versioned_dirs).load().await,
            None => CargoMetadataSource::new(root, self.versioned_dirs).load().await,
        }
    }
}
