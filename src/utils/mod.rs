//! Utilities shared by the pipeline stages.
//!
//! - [`fs`] - Atomic file writes for the generated module

pub mod fs;

pub use fs::atomic_write;
