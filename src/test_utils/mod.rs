//! Test utilities for licensed
//!
//! Shared by the unit tests and, through the `test-utils` feature, by the
//! integration suite.
//!
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`MetadataFixture`] - builds `cargo metadata --format-version 1` JSON
//!
//! # Example
//!
//! ```rust,no_run
//! use licensed_cli::test_utils::MetadataFixture;
//!
//! let json = MetadataFixture::new("app")
//!     .registry_package("serde", "1.0.210")
//!     .to_json();
//! assert!(json.contains("serde"));
//! ```

use std::path::Path;
use std::sync::Once;

use serde_json::{Value, json};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` if it is set; with neither,
/// logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

const CRATES_IO: &str = "registry+https://github.com/rust-lang/crates.io-index";

/// Builder for `cargo metadata` output with one workspace member.
#[derive(Debug, Clone)]
pub struct MetadataFixture {
    root_name: String,
    packages: Vec<Value>,
}

impl MetadataFixture {
    /// Start with the workspace member `root_name`.
    pub fn new(root_name: &str) -> Self {
        let root = package(root_name, "0.1.0", &local_id(root_name, "0.1.0"), None);
        Self {
            root_name: root_name.to_string(),
            packages: vec![root],
        }
    }

    /// Add a crates.io dependency.
    #[must_use]
    pub fn registry_package(mut self, name: &str, version: &str) -> Self {
        let id = format!("{CRATES_IO}#{name}@{version}");
        self.packages.push(package(name, version, &id, Some(CRATES_IO)));
        self
    }

    /// Add a path dependency that is not a workspace member.
    #[must_use]
    pub fn path_package(mut self, name: &str, version: &str) -> Self {
        self.packages.push(package(name, version, &local_id(name, version), None));
        self
    }

    /// The metadata document.
    pub fn to_value(&self) -> Value {
        let root_id = local_id(&self.root_name, "0.1.0");
        json!({
            "packages": self.packages,
            "workspace_members": [root_id],
            "workspace_default_members": [root_id],
            "resolve": null,
            "target_directory": "/workspace/target",
            "version": 1,
            "workspace_root": "/workspace",
            "metadata": null
        })
    }

    /// The metadata document as JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Write the JSON to `path`.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

fn local_id(name: &str, version: &str) -> String {
    format!("path+file:///workspace/{name}#{version}")
}

fn package(name: &str, version: &str, id: &str, source: Option<&str>) -> Value {
    json!({
        "name": name,
        "version": version,
        "id": id,
        "license": "MIT",
        "license_file": null,
        "description": null,
        "source": source,
        "dependencies": [],
        "targets": [],
        "features": {},
        "manifest_path": format!("/workspace/{name}/Cargo.toml"),
        "metadata": null,
        "publish": null,
        "authors": [],
        "categories": [],
        "keywords": [],
        "readme": null,
        "repository": null,
        "homepage": null,
        "documentation": null,
        "edition": "2021",
        "links": null,
        "default_run": null,
        "rust_version": null
    })
}
