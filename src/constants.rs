//! Global constants used throughout the licensed codebase.
//!
//! Defaults for the command-line surface and the names of the fixed parts of
//! the generated skeleton live here so the renderer, the injector and the CLI
//! agree on them.

use std::time::Duration;

/// Default destination of the generated module.
pub const DEFAULT_OUTPUT_PATH: &str = "licenses_generated.rs";

/// Destination value that selects standard output.
pub const STDOUT_SENTINEL: &str = "-";

/// Default name of the generated accessor function.
pub const DEFAULT_FUNCTION_NAME: &str = "license_infos";

/// Default name of the generated record type.
pub const DEFAULT_TYPE_NAME: &str = "LicenseInfo";

/// Default glob used to find a license file inside a vendored crate.
pub const DEFAULT_LICENSE_PATTERN: &str = "LICENSE*";

/// License file name preferred when several files match the pattern.
pub const PREFERRED_LICENSE_FILE: &str = "LICENSE";

/// Directory produced by `cargo vendor`; its presence marks the project root.
pub const VENDOR_DIR: &str = "vendor";

/// Record field holding the dependency name in the generated type.
pub const PACKAGE_FIELD: &str = "package";

/// Record field holding the license text in the generated type.
pub const LICENSE_TEXT_FIELD: &str = "license_text";

/// Local variable the generated accessor collects records into.
pub const RESULT_BINDING: &str = "result";

/// Method used to append a record to the result vector.
pub const APPEND_METHOD: &str = "push";

/// Timeout for `cargo metadata` (2 minutes).
///
/// Resolving metadata may touch the registry index on a cold cache.
pub const CARGO_METADATA_TIMEOUT: Duration = Duration::from_secs(120);
