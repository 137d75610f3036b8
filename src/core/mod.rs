//! Core types for licensed
//!
//! The core module holds the error taxonomy shared by every stage of the
//! generation pipeline and by the CLI.
//!
//! - [`LicensedError`] - Enumerated error types for all failure modes
//! - [`ErrorContext`] - Single-line diagnostic with an optional suggestion
//! - [`user_friendly_error`] - Convert any `anyhow::Error` into an [`ErrorContext`]

pub mod error;

pub use error::{ErrorContext, LicensedError, user_friendly_error};
