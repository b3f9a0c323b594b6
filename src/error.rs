//! Error types for registry validation

use std::path::PathBuf;

use thiserror::Error;

use crate::provenance::HostError;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Registry validation errors
///
/// Every variant is attributed to a package; release-level variants carry
/// the `releases[i].field` path in `field`. The first error encountered
/// aborts the whole run, so one run reports exactly one of these.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{package}: invalid JSON: {source}")]
    MalformedInput {
        package: String,
        source: serde_json::Error,
    },

    #[error("{package}: missing '{field}'")]
    MissingField { package: String, field: String },

    #[error("{package}: {field} must be {expected}")]
    InvalidType {
        package: String,
        field: String,
        expected: &'static str,
    },

    #[error("{package}: {field} must be {expected}")]
    InvalidFormat {
        package: String,
        field: String,
        expected: &'static str,
    },

    #[error("{package}: {field} must be an integer >= 1")]
    InvalidValue { package: String, field: String },

    #[error("{package}: {field} must be >= min ({lower})")]
    InvalidRange {
        package: String,
        field: String,
        lower: u64,
    },

    #[error("{package}: name field '{declared}' does not match filename")]
    NameMismatch { package: String, declared: String },

    #[error("{package}: duplicate release version: {version}")]
    DuplicateVersion { package: String, version: String },

    #[error("duplicate package detected by filename: {name}")]
    DuplicatePackage { name: String },

    #[error("invalid package filename: {}", path.display())]
    InvalidFilename { path: PathBuf },

    #[error("registry directory not found: {}", root.display())]
    MissingRoot { root: PathBuf },

    #[error("no package files found under {}", root.display())]
    EmptyRegistry { root: PathBuf },

    #[error("{package}: repository lookup failed for {owner}/{repo}: {source}")]
    ProvenanceUnavailable {
        package: String,
        owner: String,
        repo: String,
        source: HostError,
    },

    #[error("{package}: license must be MIT (detected: {detected})")]
    LicenseRejected { package: String, detected: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValidationError {
    /// Name of the package this error is attributed to, when there is one.
    ///
    /// Registry-level errors (`MissingRoot`, `EmptyRegistry`,
    /// `InvalidFilename`, `Io`) have no single owning package.
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { package, .. }
            | Self::MissingField { package, .. }
            | Self::InvalidType { package, .. }
            | Self::InvalidFormat { package, .. }
            | Self::InvalidValue { package, .. }
            | Self::InvalidRange { package, .. }
            | Self::NameMismatch { package, .. }
            | Self::DuplicateVersion { package, .. }
            | Self::ProvenanceUnavailable { package, .. }
            | Self::LicenseRejected { package, .. } => Some(package),
            Self::DuplicatePackage { name } => Some(name),
            _ => None,
        }
    }
}
