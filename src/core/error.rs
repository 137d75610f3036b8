//! Error handling for licensed
//!
//! Every failure in licensed is fatal: there is no retry and no degraded output mode,
//! because a half-correct license manifest is worse than a failed build step. This
//! module provides the strongly-typed [`LicensedError`] used throughout the crate and
//! the [`ErrorContext`] wrapper that turns any [`anyhow::Error`] into the single-line
//! diagnostic printed by the CLI.
//!
//! # Error Categories
//!
//! - **Configuration**: [`LicensedError::InvalidIdentifier`], [`LicensedError::InvalidLicensePattern`]
//! - **Collaborators**: [`LicensedError::DependencyToolNotFound`], [`LicensedError::DependencyToolFailed`],
//!   [`LicensedError::ProjectRootNotFound`], [`LicensedError::TargetCrateUndetectable`]
//! - **Generation invariants**: [`LicensedError::TemplateRender`], [`LicensedError::SkeletonParse`],
//!   [`LicensedError::GeneratedFunctionMissing`], [`LicensedError::MalformedSlot`],
//!   [`LicensedError::SlotCountMismatch`], [`LicensedError::UnknownDependency`]
//! - **Data**: [`LicensedError::MissingLicenseFile`], [`LicensedError::LicenseReadFailed`],
//!   [`LicensedError::UnencodableLicenseText`]
//! - **Output**: [`LicensedError::OutputWriteFailed`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use licensed_cli::core::{LicensedError, user_friendly_error};
//!
//! let error = anyhow::Error::from(LicensedError::MissingLicenseFile {
//!     name: "serde".to_string(),
//! });
//! let ctx = user_friendly_error(error);
//! ctx.display(); // error: No license file found for dependency 'serde'
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for licensed operations.
///
/// Variants carry the dependency name, path or identifier involved so that the
/// diagnostic names exactly what went wrong. Generation-invariant variants
/// (see [`LicensedError::is_internal`]) indicate a desynchronization between the
/// skeleton renderer and the literal injector rather than a user error.
#[derive(Error, Debug)]
pub enum LicensedError {
    /// A configured name cannot be used as a Rust identifier in the generated module
    #[error("'{value}' is not a valid Rust identifier for the generated {role}")]
    InvalidIdentifier {
        /// What the identifier names ("function" or "type")
        role: String,
        /// The rejected value
        value: String,
    },

    /// The license file glob pattern is malformed
    #[error("Invalid license file pattern '{pattern}': {reason}")]
    InvalidLicensePattern {
        /// The rejected pattern
        pattern: String,
        /// Why the glob crate rejected it
        reason: String,
    },

    /// The `cargo` executable could not be located
    #[error("cargo is not installed or not found in PATH")]
    DependencyToolNotFound,

    /// Running or decoding the dependency tool failed
    #[error("cargo {operation} failed: {reason}")]
    DependencyToolFailed {
        /// The cargo subcommand that failed
        operation: String,
        /// Exit status, stderr or decoding error
        reason: String,
    },

    /// No ancestor directory contains a vendor directory
    #[error("No project root found: no directory containing '{marker}' at or above {start}")]
    ProjectRootNotFound {
        /// Directory the search started from
        start: String,
        /// Name of the directory that marks the root
        marker: String,
    },

    /// The crate the output is generated into could not be determined
    #[error("Could not determine target crate for {dir}: {reason}")]
    TargetCrateUndetectable {
        /// The destination directory that was inspected
        dir: String,
        /// What was missing
        reason: String,
    },

    /// Tera failed to render the skeleton template
    #[error("Failed to render skeleton template: {reason}")]
    TemplateRender {
        /// Flattened Tera error chain
        reason: String,
    },

    /// The rendered skeleton did not parse as Rust
    #[error("Generated skeleton is not valid Rust: {reason}")]
    SkeletonParse {
        /// The syn parse error
        reason: String,
    },

    /// The accessor function was not found in the parsed skeleton
    #[error("Generated function '{name}' not found in skeleton")]
    GeneratedFunctionMissing {
        /// The configured function name
        name: String,
    },

    /// A record push statement does not have the expected shape
    #[error("Malformed license slot in '{function}': {reason}")]
    MalformedSlot {
        /// The accessor function being rewritten
        function: String,
        /// Which part of the statement was unexpected
        reason: String,
    },

    /// The number of literal slots differs from the number of dependency records
    #[error("Found {found} license slots for {expected} dependencies")]
    SlotCountMismatch {
        /// Number of dependency records
        expected: usize,
        /// Number of slots filled in the tree
        found: usize,
    },

    /// A slot names a dependency that is not in the record set
    #[error("Skeleton references unknown dependency '{name}'")]
    UnknownDependency {
        /// The decoded package name of the slot
        name: String,
    },

    /// A known dependency has no license file
    #[error("No license file found for dependency '{name}'")]
    MissingLicenseFile {
        /// The dependency identifier
        name: String,
    },

    /// Reading a license file failed
    #[error("Failed to read license of {name} ({path}): {reason}")]
    LicenseReadFailed {
        /// The dependency identifier
        name: String,
        /// The license file that could not be read
        path: String,
        /// The underlying I/O error
        reason: String,
    },

    /// License content cannot be represented as a Rust string literal
    #[error("License text of {name} cannot be embedded as a string literal: {reason}")]
    UnencodableLicenseText {
        /// The dependency identifier
        name: String,
        /// Why the bytes are not representable
        reason: String,
    },

    /// Writing the generated module failed
    #[error("Failed to write output file {path}: {reason}")]
    OutputWriteFailed {
        /// The destination path
        path: String,
        /// The underlying I/O error
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl LicensedError {
    /// Whether this error reports an inconsistency between the skeleton renderer
    /// and the literal injector rather than a problem with user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::TemplateRender { .. }
                | Self::SkeletonParse { .. }
                | Self::GeneratedFunctionMissing { .. }
                | Self::MalformedSlot { .. }
                | Self::SlotCountMismatch { .. }
                | Self::UnknownDependency { .. }
        )
    }
}

/// Error wrapper pairing a [`LicensedError`] with an actionable suggestion.
///
/// The CLI prints exactly one diagnostic line per failed run; the suggestion is
/// only emitted through `tracing` at debug level (`--verbose`).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LicensedError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without a suggestion
    #[must_use]
    pub const fn new(error: LicensedError) -> Self {
        Self {
            error,
            suggestion: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the diagnostic to stderr as a single line.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(suggestion) = &self.suggestion {
            tracing::debug!("suggestion: {}", suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, " (suggestion: {suggestion})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] for CLI display.
///
/// The full `anyhow` context chain is flattened into one line joined with `": "`.
/// When a [`LicensedError`] is anywhere in the chain, its tailored suggestion is
/// attached.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = error.chain().find_map(|cause| {
        cause.downcast_ref::<LicensedError>().and_then(suggestion_for)
    });

    // A bare LicensedError keeps its variant so callers can match on it
    let single_cause = error.chain().count() == 1;
    let ctx = if single_cause {
        match error.downcast::<LicensedError>() {
            Ok(licensed) => ErrorContext::new(licensed),
            Err(other) => ErrorContext::new(flatten(&other)),
        }
    } else {
        ErrorContext::new(flatten(&error))
    };

    match suggestion {
        Some(suggestion) => ctx.with_suggestion(suggestion),
        None => ctx,
    }
}

fn flatten(error: &anyhow::Error) -> LicensedError {
    let message = error
        .chain()
        .map(|cause| cause.to_string().replace('\n', " "))
        .collect::<Vec<_>>()
        .join(": ");
    LicensedError::Other {
        message,
    }
}

fn suggestion_for(error: &LicensedError) -> Option<String> {
    if error.is_internal() {
        return Some(
            "The generated skeleton and the literal injector disagree; this is a bug in licensed"
                .to_string(),
        );
    }

    match error {
        LicensedError::InvalidIdentifier {
            role,
            ..
        } => Some(format!(
            "Pass a snake_case name for the function (--func) or a CamelCase name for the type (--type); the {role} name must not be a Rust keyword"
        )),
        LicensedError::DependencyToolNotFound => Some(
            "Install Rust via https://rustup.rs/ or pass a pre-captured metadata file with --metadata"
                .to_string(),
        ),
        LicensedError::ProjectRootNotFound {
            ..
        } => Some("Run 'cargo vendor' in the project root or pass --root explicitly".to_string()),
        LicensedError::TargetCrateUndetectable {
            ..
        } => Some(
            "Write the output inside a Cargo package whose src/ directory holds Rust sources"
                .to_string(),
        ),
        LicensedError::MissingLicenseFile {
            name,
        } => Some(format!(
            "Check vendor/{name} for a license file or widen the search with --license-pattern"
        )),
        LicensedError::UnencodableLicenseText {
            ..
        } => Some("Convert the license file to UTF-8 in the vendored sources".to_string()),
        _ => None,
    }
}
