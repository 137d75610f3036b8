//! Parsing of the rendered skeleton into a `syn` syntax tree.
//!
//! A parse failure here means the renderer produced invalid Rust, which is an
//! internal defect rather than a problem with the input.

use syn::{File, Item, ItemFn};

use crate::core::LicensedError;

/// Parse rendered skeleton text into a syntax tree.
pub fn parse_skeleton(text: &str) -> Result<File, LicensedError> {
    syn::parse_file(text).map_err(|e| LicensedError::SkeletonParse {
        reason: e.to_string(),
    })
}

/// Locate the top-level function named `name`; it anchors slot traversal.
pub fn find_function<'a>(file: &'a mut File, name: &str) -> Result<&'a mut ItemFn, LicensedError> {
    file.items
        .iter_mut()
        .find_map(|item| match item {
            Item::Fn(function) if function.sig.ident == name => Some(function),
            _ => None,
        })
        .ok_or_else(|| LicensedError::GeneratedFunctionMissing {
            name: name.to_string(),
        })
}
