//! Descriptor data model
//!
//! Typed views of a package descriptor, produced by successful
//! validation. Release-level types round-trip the on-disk JSON keys;
//! [`PackageDescriptor::repository`] is the parsed form of what is a raw
//! URL string on disk.

use serde::{Deserialize, Serialize};

/// A package descriptor that has passed validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Canonical package name (equal to the descriptor's file stem)
    pub name: String,
    /// Descriptor schema generation, >= 1
    #[serde(rename = "schema-version")]
    pub schema_version: u64,
    /// Source repository coordinates
    pub repository: RepositoryRef,
    /// When the package entered the registry, `YYYY-MM-DD`
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Release history in descriptor order, never empty
    pub releases: Vec<Release>,
}

impl PackageDescriptor {
    /// Look up a release by its exact version string
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.version == version)
    }
}

/// Owner/repo coordinates extracted from a descriptor's repository URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// The verbatim URL from the descriptor
    pub url: String,
    pub owner: String,
    /// Repo segment with any trailing `.git` stripped
    pub repo: String,
}

/// One published version of a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Exact version string; unique within the package as a raw string
    pub version: String,
    /// Publication date, `YYYY-MM-DD`
    #[serde(rename = "releasedAt")]
    pub released_at: String,
    /// Compatible compiler-drop range
    #[serde(rename = "compiler-drop")]
    pub compiler_drop: CompilerDrop,
    /// Provenance of the release artifact
    pub source: SourceRef,
}

/// Compiler-drop compatibility bounds, `tested_on >= min >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDrop {
    pub min: u64,
    #[serde(rename = "tested-on")]
    pub tested_on: u64,
}

/// Source provenance for one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Full 40-hex git commit id
    pub commit: String,
    /// 64-hex SHA-256 digest of the release artifact
    pub sha256: String,
}
