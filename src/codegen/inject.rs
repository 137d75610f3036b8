//! Literal injection of license texts into the skeleton tree.
//!
//! Each record in the skeleton is appended by a statement of the form
//!
//! ```rust,ignore
//! result.push(LicenseInfo { package: "serde", license_text: "" });
//! ```
//!
//! A *literal slot* is the `license_text` field value of the struct literal that
//! is the last argument of such a `push` call. The injector walks the accessor
//! body in statement order, decodes the `package` literal, looks the dependency
//! up by name, reads its license file and swaps the placeholder for a string
//! literal built by `proc_macro2`. Only literal expression nodes are replaced,
//! so the tree stays a valid parse of Rust at every step.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;
use proc_macro2::Span;
use quote::ToTokens;
use syn::{Expr, ExprLit, ExprStruct, File, Lit, LitStr, Member, Stmt};
use tracing::{debug, trace};

use super::parser::find_function;
use crate::constants::{APPEND_METHOD, LICENSE_TEXT_FIELD, PACKAGE_FIELD, RESULT_BINDING};
use crate::core::LicensedError;
use crate::models::DependencyRecord;

/// Source of license file contents.
///
/// The default [`FsLicenseReader`] reads from disk; tests substitute in-memory
/// readers to exercise failure paths.
pub trait LicenseReader {
    /// Read the complete contents of `path`.
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads license files from the filesystem, one scoped handle per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLicenseReader;

impl LicenseReader for FsLicenseReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Fill every literal slot of `function_name` with the matching license text.
///
/// Returns the number of slots filled, which always equals `records.len()` on
/// success.
///
/// # Errors
///
/// - [`LicensedError::GeneratedFunctionMissing`] if the accessor is absent
/// - [`LicensedError::MalformedSlot`] if a record statement lacks a string
///   `package` or `license_text` field, or names a dependency twice
/// - [`LicensedError::UnknownDependency`] if a slot names no known record
/// - [`LicensedError::MissingLicenseFile`] if the record has no license path
/// - [`LicensedError::LicenseReadFailed`] if the file cannot be read
/// - [`LicensedError::UnencodableLicenseText`] if the file is not UTF-8
/// - [`LicensedError::SlotCountMismatch`] if slots and records differ in number
pub fn inject_licenses(
    file: &mut File,
    function_name: &str,
    records: &[DependencyRecord],
    reader: &dyn LicenseReader,
) -> Result<usize> {
    let by_name: HashMap<&str, &DependencyRecord> =
        records.iter().map(|record| (record.name.as_str(), record)).collect();
    let function = find_function(file, function_name)?;

    let mut seen = HashSet::new();
    for stmt in &mut function.block.stmts {
        let Some(slot) = record_slot(stmt) else {
            trace!("Skipping non-record statement");
            continue;
        };

        let package = package_name(slot, function_name)?;
        let record = by_name.get(package.as_str()).ok_or_else(|| {
            LicensedError::UnknownDependency {
                name: package.clone(),
            }
        })?;
        if !seen.insert(record.name.as_str()) {
            return Err(LicensedError::MalformedSlot {
                function: function_name.to_string(),
                reason: format!("dependency '{package}' has more than one slot"),
            }
            .into());
        }

        let license_path =
            record.license_path.as_deref().ok_or_else(|| LicensedError::MissingLicenseFile {
                name: record.name.clone(),
            })?;
        let literal = license_literal(&record.name, license_path, reader)?;
        replace_license_text(slot, literal, function_name)?;

        debug!("Embedded license of {} from {}", record.name, license_path.display());
    }

    if seen.len() != records.len() {
        return Err(LicensedError::SlotCountMismatch {
            expected: records.len(),
            found: seen.len(),
        }
        .into());
    }

    Ok(seen.len())
}

/// Match `result.push(<struct literal>);` and return the struct literal.
fn record_slot(stmt: &mut Stmt) -> Option<&mut ExprStruct> {
    let Stmt::Expr(Expr::MethodCall(call), Some(_)) = stmt else {
        return None;
    };
    if call.method != APPEND_METHOD {
        return None;
    }
    if !matches!(&*call.receiver, Expr::Path(receiver) if receiver.path.is_ident(RESULT_BINDING)) {
        return None;
    }

    match call.args.last_mut() {
        Some(Expr::Struct(record)) => Some(record),
        _ => None,
    }
}

fn field_expr<'a>(record: &'a mut ExprStruct, field: &str) -> Option<&'a mut Expr> {
    record.fields.iter_mut().find_map(|value| match &value.member {
        Member::Named(ident) if ident == field => Some(&mut value.expr),
        _ => None,
    })
}

fn as_str_literal(expr: &Expr) -> Option<&LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(literal),
            ..
        }) => Some(literal),
        _ => None,
    }
}

/// Decode the `package` field of a record literal.
fn package_name(record: &mut ExprStruct, function_name: &str) -> Result<String, LicensedError> {
    let shown = record.to_token_stream().to_string();
    field_expr(record, PACKAGE_FIELD)
        .and_then(|expr| as_str_literal(expr))
        .map(LitStr::value)
        .ok_or_else(|| LicensedError::MalformedSlot {
            function: function_name.to_string(),
            reason: format!("no string '{PACKAGE_FIELD}' field in `{shown}`"),
        })
}

/// Read a license file and encode it as a string literal expression.
fn license_literal(name: &str, path: &Path, reader: &dyn LicenseReader) -> Result<Expr, LicensedError> {
    let bytes = reader.read(path).map_err(|e| LicensedError::LicenseReadFailed {
        name: name.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    // `&'static str` literals can only hold UTF-8
    let text = String::from_utf8(bytes).map_err(|e| LicensedError::UnencodableLicenseText {
        name: name.to_string(),
        reason: format!("invalid UTF-8 at byte offset {}", e.utf8_error().valid_up_to()),
    })?;

    Ok(string_literal(&text))
}

/// Build a string literal node whose decoded value is exactly `text`.
pub(crate) fn string_literal(text: &str) -> Expr {
    Expr::Lit(ExprLit {
        attrs: Vec::new(),
        lit: Lit::Str(LitStr::new(text, Span::call_site())),
    })
}

/// Swap the `license_text` placeholder for `literal`.
fn replace_license_text(
    record: &mut ExprStruct,
    literal: Expr,
    function_name: &str,
) -> Result<(), LicensedError> {
    let shown = record.to_token_stream().to_string();
    let slot = field_expr(record, LICENSE_TEXT_FIELD)
        .filter(|expr| as_str_literal(expr).is_some())
        .ok_or_else(|| LicensedError::MalformedSlot {
            function: function_name.to_string(),
            reason: format!("no string '{LICENSE_TEXT_FIELD}' field in `{shown}`"),
        })?;
    *slot = literal;
    Ok(())
}
