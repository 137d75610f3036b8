//! Skeleton rendering with Tera.
//!
//! The skeleton is the generated module with every license text left as an
//! empty placeholder literal. Only trusted scaffolding passes through the
//! template: the configured identifiers (validated here) and the dependency
//! names (encoded by the `rust_str` filter). License file contents never reach
//! this stage; they are injected later into the parsed tree by
//! [`inject`](super::inject).
//!
//! The rendered shape is fixed and must stay in sync with the slot locator in
//! [`inject`](super::inject):
//!
//! ```rust,ignore
//! pub fn license_infos() -> Vec<LicenseInfo> {
//!     let mut result = Vec::with_capacity(2);
//!     result.push(LicenseInfo { package: "serde", license_text: "" });
//!     result.push(LicenseInfo { package: "syn", license_text: "" });
//!     result
//! }
//! ```

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::core::LicensedError;
use crate::models::{DependencyRecord, GenerationConfig};

/// Template name; the `.rs` suffix keeps Tera's HTML autoescaping off.
const SKELETON_TEMPLATE_NAME: &str = "licenses_generated.rs";

const SKELETON_TEMPLATE: &str = r#"//! Third-party license texts bundled into `{{ crate_name }}`.

/// License information of one vendored dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct {{ type_name }} {
    /// Name of the dependency.
    pub package: &'static str,
    /// Full text of the dependency's license file.
    pub license_text: &'static str,
}

/// Returns the license information of every vendored dependency, in dependency order.
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn {{ function_name }}() -> Vec<{{ type_name }}> {
    let mut result = Vec::with_capacity({{ packages | length }});
{%- for package in packages %}
    result.push({{ type_name }} { package: {{ package | rust_str }}, license_text: "" });
{%- endfor %}
    result
}
"#;

/// Type names that would change the meaning of the skeleton's own type references.
const RESERVED_TYPE_NAMES: &[&str] = &["Vec", "str"];

/// Keywords reserved in newer editions that `syn` still accepts as identifiers.
const RESERVED_KEYWORDS: &[&str] = &["gen"];

#[derive(Serialize)]
struct SkeletonContext<'a> {
    crate_name: &'a str,
    type_name: &'a str,
    function_name: &'a str,
    packages: Vec<&'a str>,
}

/// Renders the placeholder module for a list of dependencies.
pub struct SkeletonRenderer {
    tera: Tera,
}

impl SkeletonRenderer {
    /// Create a renderer with the skeleton template and the `rust_str` filter registered.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(SKELETON_TEMPLATE_NAME, SKELETON_TEMPLATE).map_err(|e| {
            LicensedError::TemplateRender {
                reason: format_tera_error(&e),
            }
        })?;
        tera.register_filter("rust_str", rust_str_filter);

        Ok(Self {
            tera,
        })
    }

    /// Render the skeleton for `records`, in order.
    ///
    /// # Errors
    ///
    /// - [`LicensedError::InvalidIdentifier`] if the configured function or type
    ///   name cannot be used in the generated module
    /// - [`LicensedError::TemplateRender`] if Tera fails
    pub fn render(&self, records: &[DependencyRecord], config: &GenerationConfig) -> Result<String> {
        validate_identifiers(&config.function_name, &config.type_name)?;

        let context = SkeletonContext {
            crate_name: &config.crate_name,
            type_name: &config.type_name,
            function_name: &config.function_name,
            packages: records.iter().map(|record| record.name.as_str()).collect(),
        };
        let context = TeraContext::from_serialize(&context).map_err(|e| {
            LicensedError::TemplateRender {
                reason: format_tera_error(&e),
            }
        })?;

        let rendered = self.tera.render(SKELETON_TEMPLATE_NAME, &context).map_err(|e| {
            LicensedError::TemplateRender {
                reason: format_tera_error(&e),
            }
        })?;

        tracing::debug!(
            "Rendered skeleton for {} dependencies ({} bytes)",
            records.len(),
            rendered.len()
        );
        Ok(rendered)
    }
}

/// Check that the configured names are usable in the generated module.
///
/// Both names must parse as Rust identifiers (keywords are rejected) and the
/// type name must not shadow a type the skeleton itself refers to.
pub fn validate_identifiers(function_name: &str, type_name: &str) -> Result<(), LicensedError> {
    for (role, value) in [("function", function_name), ("type", type_name)] {
        if syn::parse_str::<syn::Ident>(value).is_err() || RESERVED_KEYWORDS.contains(&value) {
            return Err(LicensedError::InvalidIdentifier {
                role: role.to_string(),
                value: value.to_string(),
            });
        }
    }

    if RESERVED_TYPE_NAMES.contains(&type_name) {
        return Err(LicensedError::InvalidIdentifier {
            role: "type".to_string(),
            value: type_name.to_string(),
        });
    }

    Ok(())
}

/// Tera filter quoting a string as a Rust string literal.
fn rust_str_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let text = value.as_str().ok_or_else(|| tera::Error::msg("rust_str filter requires a string"))?;
    Ok(tera::Value::String(proc_macro2::Literal::string(text).to_string()))
}

/// Flatten a Tera error chain into one line.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        messages.push(err.to_string());
        current = err.source();
    }
    messages.join(": ")
}
