//! Registry orchestration
//!
//! Discovers descriptor files under the registry root and aggregates
//! per-package validation. Files are processed one at a time in sorted
//! path order, so the same invalid registry always reports the same
//! first failure. A run ends in exactly one of two states: every
//! descriptor valid, or one attributed rejection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ValidationMode;
use crate::error::{Result, ValidationError};
use crate::package::PackageValidator;

/// Outcome of a fully successful validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Number of package descriptors validated
    pub packages: usize,
    /// Which tier of checks ran
    pub mode: ValidationMode,
}

/// Validates every package descriptor under a registry root
pub struct RegistryValidator<'h> {
    root: PathBuf,
    package: PackageValidator<'h>,
}

impl<'h> RegistryValidator<'h> {
    pub fn new(root: impl Into<PathBuf>, package: PackageValidator<'h>) -> Self {
        Self {
            root: root.into(),
            package,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate the whole registry, stopping at the first failure.
    ///
    /// Cross-file invariants live here: the filename itself must satisfy
    /// the package name format, and base filenames must be globally
    /// unique — including across subdirectories, regardless of what the
    /// descriptors' internal `name` fields say.
    pub fn validate(&self) -> Result<ValidationSummary> {
        if !self.root.is_dir() {
            return Err(ValidationError::MissingRoot {
                root: self.root.clone(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ValidationError::EmptyRegistry {
                root: self.root.clone(),
            });
        }

        let mut seen_names: HashSet<String> = HashSet::new();
        for path in &files {
            // Filename checks come before the file is even opened
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !self.package.rules().is_package_name(&stem) {
                return Err(ValidationError::InvalidFilename { path: path.clone() });
            }
            if !seen_names.insert(stem.clone()) {
                return Err(ValidationError::DuplicatePackage { name: stem });
            }

            tracing::debug!(package = %stem, path = %path.display(), "validating package");
            self.package.validate_file(path)?;
        }

        Ok(ValidationSummary {
            packages: files.len(),
            mode: self.package.mode(),
        })
    }
}
