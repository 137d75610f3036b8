//! Builder for running cargo subcommands with consistent error handling.
//!
//! Only `cargo metadata` is needed today, but the builder keeps argument
//! assembly, timeouts and error mapping in one place.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::CARGO_METADATA_TIMEOUT;
use crate::core::LicensedError;

/// Resolve the cargo executable.
///
/// Honors the `CARGO` environment variable (set by cargo for build scripts and
/// `cargo run`), falling back to a `PATH` lookup.
pub fn find_cargo() -> Result<PathBuf, LicensedError> {
    resolve_cargo(std::env::var_os("CARGO"))
}

fn resolve_cargo(from_env: Option<OsString>) -> Result<PathBuf, LicensedError> {
    if let Some(path) = from_env.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    which::which("cargo").map_err(|_| LicensedError::DependencyToolNotFound)
}

/// Fluent builder for a single cargo invocation.
///
/// ```rust,ignore
/// use licensed_cli::deps::command::CargoCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let json = CargoCommand::new()
///     .args(["metadata", "--format-version", "1"])
///     .current_dir("/path/to/project")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CargoCommand {
    /// Explicit cargo binary; resolved with [`find_cargo`] when unset
    program: Option<PathBuf>,

    args: Vec<String>,

    current_dir: Option<PathBuf>,

    timeout_duration: Duration,
}

impl Default for CargoCommand {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            current_dir: None,
            timeout_duration: CARGO_METADATA_TIMEOUT,
        }
    }
}

impl CargoCommand {
    /// Creates a builder with the default timeout and no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific cargo binary instead of looking one up.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Run cargo in `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Runs the command and returns its stdout.
    ///
    /// A non-zero exit, a timeout, or stdout that is not UTF-8 all map to
    /// [`LicensedError::DependencyToolFailed`].
    pub async fn execute_stdout(self) -> Result<String> {
        let start = std::time::Instant::now();
        let program = match &self.program {
            Some(program) => program.clone(),
            None => find_cargo()?,
        };
        let operation = self.operation();

        let mut cmd = Command::new(&program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);

        tracing::debug!(
            target: "cargo",
            "Executing command: {} {}",
            program.display(),
            self.args.join(" ")
        );

        let duration = self.timeout_duration;
        let output = if let Ok(result) = timeout(duration, cmd.output()).await {
            result.with_context(|| {
                format!("Failed to execute {} {}", program.display(), self.args.join(" "))
            })?
        } else {
            tracing::warn!(
                target: "cargo",
                "Command timed out after {} seconds: cargo {}",
                duration.as_secs(),
                self.args.join(" ")
            );
            return Err(LicensedError::DependencyToolFailed {
                operation,
                reason: format!("timed out after {} seconds", duration.as_secs()),
            }
            .into());
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            tracing::debug!(
                target: "cargo",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            let reason = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                message => message.to_string(),
            };
            return Err(LicensedError::DependencyToolFailed {
                operation,
                reason,
            }
            .into());
        }
        if !stderr.trim().is_empty() {
            tracing::trace!(target: "cargo", "{}", stderr.trim());
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|e| LicensedError::DependencyToolFailed {
                operation: operation.clone(),
                reason: format!("output is not valid UTF-8: {e}"),
            })?;

        tracing::debug!(
            target: "cargo::perf",
            "cargo {} took {}ms",
            operation,
            start.elapsed().as_millis()
        );
        Ok(stdout)
    }
}
