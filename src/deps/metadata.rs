//! Conversion of `cargo metadata` output into dependency records.
//!
//! Third-party packages are the packages with a source (registry or git) that
//! are not workspace members. Names follow the directory layout of
//! `cargo vendor`: when a crate is present in several versions, the newest one
//! keeps the bare name and older ones become `name-version`. With
//! `versioned_dirs` every package is named `name-version`.

use std::collections::{BTreeSet, HashMap, HashSet};

use anyhow::Result;
use cargo_metadata::semver::Version;
use cargo_metadata::{Metadata, MetadataCommand, Package};

use crate::core::LicensedError;
use crate::models::DependencyRecord;

/// Parse `cargo metadata --format-version 1` JSON.
pub fn parse_metadata(json: &str) -> Result<Metadata, LicensedError> {
    MetadataCommand::parse(json).map_err(|e| LicensedError::DependencyToolFailed {
        operation: "metadata".to_string(),
        reason: format!("malformed output: {e}"),
    })
}

/// Ordered third-party records, sorted by name then version.
pub fn third_party_records(metadata: &Metadata, versioned_dirs: bool) -> Vec<DependencyRecord> {
    let members: HashSet<_> = metadata.workspace_members.iter().collect();

    let mut seen = BTreeSet::new();
    let packages: Vec<&Package> = metadata
        .packages
        .iter()
        .filter(|package| package.source.is_some() && !members.contains(&package.id))
        .filter(|package| seen.insert((package.name.as_str(), &package.version)))
        .collect();

    let mut newest: HashMap<&str, &Version> = HashMap::new();
    for package in &packages {
        newest
            .entry(package.name.as_str())
            .and_modify(|version| {
                if package.version > **version {
                    *version = &package.version;
                }
            })
            .or_insert(&package.version);
    }

    let mut sorted = packages;
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));

    sorted
        .into_iter()
        .map(|package| {
            let is_newest = newest.get(package.name.as_str()) == Some(&&package.version);
            let name = if versioned_dirs || !is_newest {
                format!("{}-{}", package.name, package.version)
            } else {
                package.name.to_string()
            };
            DependencyRecord::new(name)
        })
        .collect()
}

/// Parse metadata JSON straight into records.
pub fn records_from_json(json: &str, versioned_dirs: bool) -> Result<Vec<DependencyRecord>> {
    let metadata = parse_metadata(json)?;
    let records = third_party_records(&metadata, versioned_dirs);
    tracing::debug!(
        "Found {} third-party packages among {} total",
        records.len(),
        metadata.packages.len()
    );
    Ok(records)
}
