//! licensed - embed third-party license texts into a Rust binary
//!
//! `licensed` generates a Rust module that carries the license text of every
//! vendored third-party dependency as compiled-in data, so a shipped binary can
//! report its licensing obligations without a `vendor/` directory at runtime.
//!
//! # Architecture Overview
//!
//! The only part with real risk is getting untrusted license text into Rust
//! source safely. License files are multi-line and may contain quotes,
//! backslashes, `{{` sequences or `#` runs. They never go through a template:
//!
//! 1. a Tera template renders a skeleton module from dependency *names* only,
//!    with an empty string in every license slot;
//! 2. the skeleton is parsed with `syn`;
//! 3. each slot is located structurally and its empty literal is replaced by a
//!    string literal node holding the file's content;
//! 4. the tree is printed with `prettyplease`.
//!
//! # Core Modules
//!
//! ## Generation
//! - [`codegen`] - Skeleton rendering, parsing, literal injection, printing
//! - [`models`] - Dependency records, destinations and generation settings
//!
//! ## Collaborators
//! - [`deps`] - Third-party dependency list from `cargo metadata`
//! - [`locator`] - License file discovery under `vendor/`
//! - [`project`] - Project root and target crate detection
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`constants`] - Defaults shared across modules
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - Atomic file writes
//!
//! # Generated Module
//!
//! With the defaults, the output looks like:
//!
//! ```rust,ignore
//! // @generated by licensed. Do not edit by hand.
//!
//! //! Third-party license texts bundled into `my_app`.
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! pub struct LicenseInfo {
//!     pub package: &'static str,
//!     pub license_text: &'static str,
//! }
//! #[allow(unused_mut, clippy::vec_init_then_push)]
//! pub fn license_infos() -> Vec<LicenseInfo> {
//!     let mut result = Vec::with_capacity(1);
//!     result.push(LicenseInfo {
//!         package: "serde",
//!         license_text: "MIT License\n...",
//!     });
//!     result
//! }
//! ```

pub mod cli;
pub mod codegen;
pub mod constants;
pub mod core;
pub mod deps;
pub mod locator;
pub mod models;
pub mod project;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
