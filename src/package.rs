//! Package validation
//!
//! Validates one descriptor file: top-level shape, field formats, the
//! release list, and (in online mode) repository provenance against the
//! hosting platform. Every check is attributed to the package by name,
//! and the first violation aborts the run.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::ValidationMode;
use crate::descriptor::{PackageDescriptor, RepositoryRef};
use crate::error::{Result, ValidationError};
use crate::format::FormatRules;
use crate::provenance::RepositoryHost;
use crate::release::validate_release;

/// The only license the registry accepts from hosted repositories
pub const ACCEPTED_LICENSE: &str = "MIT";

/// Keys every descriptor must carry at the top level
const REQUIRED_KEYS: [&str; 5] = ["name", "schema-version", "repository", "releases", "createdAt"];

/// Validates individual package descriptors
///
/// Offline by default; supplying a [`RepositoryHost`] switches on the
/// per-package provenance lookup. The host is injected rather than
/// constructed here so tests can run online-mode logic against a fake.
pub struct PackageValidator<'h> {
    rules: FormatRules,
    host: Option<&'h dyn RepositoryHost>,
}

impl<'h> PackageValidator<'h> {
    /// Offline validator: syntactic and semantic checks only
    pub fn offline() -> Self {
        Self {
            rules: FormatRules::new(),
            host: None,
        }
    }

    /// Online validator: offline checks plus one provenance lookup per package
    pub fn online(host: &'h dyn RepositoryHost) -> Self {
        Self {
            rules: FormatRules::new(),
            host: Some(host),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        if self.host.is_some() {
            ValidationMode::Online
        } else {
            ValidationMode::Offline
        }
    }

    pub fn rules(&self) -> &FormatRules {
        &self.rules
    }

    /// Validate a descriptor file. The file stem is the canonical package
    /// name the descriptor's `name` field must agree with.
    pub fn validate_file(&self, path: &Path) -> Result<PackageDescriptor> {
        let package_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = fs::read_to_string(path)?;
        self.validate_str(&package_name, &text)
    }

    /// Validate descriptor text against the given canonical package name.
    pub fn validate_str(&self, package_name: &str, text: &str) -> Result<PackageDescriptor> {
        let data: Value =
            serde_json::from_str(text).map_err(|err| ValidationError::MalformedInput {
                package: package_name.to_string(),
                source: err,
            })?;

        let root = data
            .as_object()
            .ok_or_else(|| ValidationError::InvalidType {
                package: package_name.to_string(),
                field: "root".to_string(),
                expected: "a JSON object",
            })?;

        for key in REQUIRED_KEYS {
            if !root.contains_key(key) {
                return Err(ValidationError::MissingField {
                    package: package_name.to_string(),
                    field: key.to_string(),
                });
            }
        }

        // Declared name must agree with the file stem. Compared as JSON
        // values so a non-string name is a mismatch, not a panic.
        if root["name"] != Value::from(package_name) {
            let declared = root["name"]
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| root["name"].to_string());
            return Err(ValidationError::NameMismatch {
                package: package_name.to_string(),
                declared,
            });
        }

        let schema_version = match root["schema-version"].as_u64() {
            Some(v) if v >= 1 => v,
            _ => {
                return Err(ValidationError::InvalidValue {
                    package: package_name.to_string(),
                    field: "schema-version".to_string(),
                })
            }
        };

        let created_at = match root["createdAt"].as_str() {
            Some(d) if self.rules.is_date(d) => d,
            _ => {
                return Err(ValidationError::InvalidFormat {
                    package: package_name.to_string(),
                    field: "createdAt".to_string(),
                    expected: "YYYY-MM-DD",
                })
            }
        };

        let repository_url =
            root["repository"]
                .as_str()
                .ok_or_else(|| ValidationError::InvalidType {
                    package: package_name.to_string(),
                    field: "repository".to_string(),
                    expected: "a string",
                })?;
        let (owner, repo) = self.rules.split_repository(repository_url).ok_or_else(|| {
            ValidationError::InvalidFormat {
                package: package_name.to_string(),
                field: "repository".to_string(),
                expected: "a GitHub URL like https://github.com/owner/repo",
            }
        })?;

        let release_values = match root["releases"].as_array() {
            Some(list) if !list.is_empty() => list,
            _ => {
                return Err(ValidationError::InvalidType {
                    package: package_name.to_string(),
                    field: "releases".to_string(),
                    expected: "a non-empty array",
                })
            }
        };

        let mut seen_versions: HashSet<String> = HashSet::new();
        let mut releases = Vec::with_capacity(release_values.len());
        for (index, value) in release_values.iter().enumerate() {
            releases.push(validate_release(
                value,
                package_name,
                index,
                &mut seen_versions,
                &self.rules,
            )?);
        }

        if let Some(host) = self.host {
            self.check_provenance(package_name, host, &owner, &repo)?;
        }

        Ok(PackageDescriptor {
            name: package_name.to_string(),
            schema_version,
            repository: RepositoryRef {
                url: repository_url.to_string(),
                owner,
                repo,
            },
            created_at: created_at.to_string(),
            releases,
        })
    }

    /// Online check: the repository exists and declares the accepted license.
    fn check_provenance(
        &self,
        package_name: &str,
        host: &dyn RepositoryHost,
        owner: &str,
        repo: &str,
    ) -> Result<()> {
        let metadata =
            host.repository_metadata(owner, repo)
                .map_err(|err| ValidationError::ProvenanceUnavailable {
                    package: package_name.to_string(),
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    source: err,
                })?;

        let detected = metadata.spdx_id().unwrap_or("unknown");
        if detected != ACCEPTED_LICENSE {
            return Err(ValidationError::LicenseRejected {
                package: package_name.to_string(),
                detected: detected.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::{HostError, LicenseInfo, RepositoryMetadata};
    use serde_json::json;

    fn valid_descriptor() -> Value {
        json!({
            "name": "coi-http",
            "schema-version": 1,
            "repository": "https://github.com/coi-lang/coi-http",
            "createdAt": "2024-01-01",
            "releases": [{
                "version": "1.0.0",
                "releasedAt": "2024-01-01",
                "compiler-drop": { "min": 1, "tested-on": 1 },
                "source": {
                    "commit": "a".repeat(40),
                    "sha256": "b".repeat(64),
                }
            }]
        })
    }

    fn check_offline(name: &str, value: &Value) -> Result<PackageDescriptor> {
        PackageValidator::offline().validate_str(name, &value.to_string())
    }

    /// Fake host answering every lookup with one canned result
    struct FixedHost(std::result::Result<RepositoryMetadata, u16>);

    impl FixedHost {
        fn with_license(spdx_id: Option<&str>) -> Self {
            Self(Ok(RepositoryMetadata {
                license: Some(LicenseInfo {
                    spdx_id: spdx_id.map(str::to_owned),
                }),
            }))
        }
    }

    impl RepositoryHost for FixedHost {
        fn repository_metadata(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> std::result::Result<RepositoryMetadata, HostError> {
            match &self.0 {
                Ok(meta) => Ok(meta.clone()),
                Err(status) => Err(HostError::Status(*status)),
            }
        }
    }

    #[test]
    fn test_minimal_valid_descriptor_passes_offline() {
        let value = json!({
            "name": "abcd",
            "schema-version": 1,
            "repository": "https://github.com/o/r",
            "createdAt": "2024-01-01",
            "releases": [{
                "version": "1.0.0",
                "releasedAt": "2024-01-01",
                "compiler-drop": { "min": 1, "tested-on": 1 },
                "source": {
                    "commit": "a".repeat(40),
                    "sha256": "b".repeat(64),
                }
            }]
        });
        let descriptor = check_offline("abcd", &value).unwrap();
        assert_eq!(descriptor.name, "abcd");
        assert_eq!(descriptor.repository.owner, "o");
        assert_eq!(descriptor.repository.repo, "r");
        assert_eq!(descriptor.releases.len(), 1);
    }

    #[test]
    fn test_malformed_json_attributed_to_package() {
        let err = PackageValidator::offline()
            .validate_str("coi-http", "{ not json")
            .unwrap_err();
        match err {
            ValidationError::MalformedInput { package, .. } => {
                assert_eq!(package, "coi-http");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_top_level_key_named() {
        let mut value = valid_descriptor();
        value.as_object_mut().unwrap().remove("createdAt");
        let err = check_offline("coi-http", &value).unwrap_err();
        match err {
            ValidationError::MissingField { field, .. } => assert_eq!(field, "createdAt"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_name_filename_mismatch() {
        let err = check_offline("other-name", &valid_descriptor()).unwrap_err();
        match err {
            ValidationError::NameMismatch { declared, .. } => {
                assert_eq!(declared, "coi-http");
            }
            other => panic!("expected NameMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_name_is_mismatch() {
        let mut value = valid_descriptor();
        value["name"] = json!(7);
        let err = check_offline("coi-http", &value).unwrap_err();
        assert!(matches!(err, ValidationError::NameMismatch { .. }));
    }

    #[test]
    fn test_schema_version_zero_rejected() {
        let mut value = valid_descriptor();
        value["schema-version"] = json!(0);
        let err = check_offline("coi-http", &value).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_repository_extra_segment_rejected_offline() {
        let mut value = valid_descriptor();
        value["repository"] = json!("https://github.com/coi-lang/coi-http/extra");
        let err = check_offline("coi-http", &value).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { ref field, .. } if field == "repository"
        ));
    }

    #[test]
    fn test_git_suffix_stripped_from_repo() {
        let mut value = valid_descriptor();
        value["repository"] = json!("https://github.com/coi-lang/coi-http.git");
        let descriptor = check_offline("coi-http", &value).unwrap();
        assert_eq!(descriptor.repository.repo, "coi-http");
        assert_eq!(
            descriptor.repository.url,
            "https://github.com/coi-lang/coi-http.git"
        );
    }

    #[test]
    fn test_empty_releases_rejected() {
        let mut value = valid_descriptor();
        value["releases"] = json!([]);
        let err = check_offline("coi-http", &value).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn test_duplicate_version_across_list_positions() {
        let mut value = valid_descriptor();
        let mut second = value["releases"][0].clone();
        second["version"] = json!("2.0.0");
        let third = value["releases"][0].clone();
        value["releases"]
            .as_array_mut()
            .unwrap()
            .extend([second, third]);
        let err = check_offline("coi-http", &value).unwrap_err();
        match err {
            ValidationError::DuplicateVersion { version, .. } => assert_eq!(version, "1.0.0"),
            other => panic!("expected DuplicateVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_offline_mode_skips_provenance() {
        // Offline validation of a descriptor whose repository does not
        // exist anywhere must still pass
        let validator = PackageValidator::offline();
        assert_eq!(validator.mode(), ValidationMode::Offline);
        assert!(validator
            .validate_str("coi-http", &valid_descriptor().to_string())
            .is_ok());
    }

    #[test]
    fn test_online_mit_license_passes() {
        let host = FixedHost::with_license(Some("MIT"));
        let validator = PackageValidator::online(&host);
        assert_eq!(validator.mode(), ValidationMode::Online);
        assert!(validator
            .validate_str("coi-http", &valid_descriptor().to_string())
            .is_ok());
    }

    #[test]
    fn test_online_other_license_rejected() {
        let host = FixedHost::with_license(Some("Apache-2.0"));
        let err = PackageValidator::online(&host)
            .validate_str("coi-http", &valid_descriptor().to_string())
            .unwrap_err();
        match err {
            ValidationError::LicenseRejected { detected, .. } => {
                assert_eq!(detected, "Apache-2.0");
            }
            other => panic!("expected LicenseRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_online_absent_license_reported_unknown() {
        let host = FixedHost(Ok(RepositoryMetadata::default()));
        let err = PackageValidator::online(&host)
            .validate_str("coi-http", &valid_descriptor().to_string())
            .unwrap_err();
        match err {
            ValidationError::LicenseRejected { detected, .. } => {
                assert_eq!(detected, "unknown");
            }
            other => panic!("expected LicenseRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_online_lookup_failure_is_provenance_unavailable() {
        let host = FixedHost(Err(404));
        let err = PackageValidator::online(&host)
            .validate_str("coi-http", &valid_descriptor().to_string())
            .unwrap_err();
        match err {
            ValidationError::ProvenanceUnavailable {
                owner,
                repo,
                source,
                ..
            } => {
                assert_eq!(owner, "coi-lang");
                assert_eq!(repo, "coi-http");
                assert_eq!(source.status(), Some(404));
            }
            other => panic!("expected ProvenanceUnavailable, got {other:?}"),
        }
    }
}
