//! Release validation
//!
//! Validates one release record against the registry invariants, given
//! the set of version strings already accepted for the owning package.
//! The seen-version set is threaded through as a parameter so the
//! validator stays re-entrant; there is no process-wide state.

use std::collections::HashSet;

use serde_json::Value;

use crate::descriptor::{CompilerDrop, Release, SourceRef};
use crate::error::{Result, ValidationError};
use crate::format::FormatRules;

/// Keys every release record must carry
const REQUIRED_KEYS: [&str; 4] = ["version", "compiler-drop", "releasedAt", "source"];

/// Validate one release record and return its typed form.
///
/// Checks run in a fixed order and the first violation is returned, so a
/// run always reports the same failure for the same input. On success the
/// release's version string is added to `seen_versions` — the caller
/// threads one set across all releases of a package.
pub fn validate_release(
    value: &Value,
    package: &str,
    index: usize,
    seen_versions: &mut HashSet<String>,
    rules: &FormatRules,
) -> Result<Release> {
    let at = |field: &str| format!("releases[{index}].{field}");

    let record = value
        .as_object()
        .ok_or_else(|| ValidationError::InvalidType {
            package: package.to_string(),
            field: format!("releases[{index}]"),
            expected: "an object",
        })?;

    for key in REQUIRED_KEYS {
        if !record.contains_key(key) {
            return Err(ValidationError::MissingField {
                package: package.to_string(),
                field: at(key),
            });
        }
    }

    let version = match record["version"].as_str() {
        Some(v) if rules.is_semver(v) => v,
        _ => {
            return Err(ValidationError::InvalidFormat {
                package: package.to_string(),
                field: at("version"),
                expected: "semver (e.g. 1.0.0)",
            })
        }
    };
    // Uniqueness is over raw strings: "1.0.0-RC1" and "1.0.0-rc1" are
    // distinct releases as far as the registry is concerned.
    if !seen_versions.insert(version.to_string()) {
        return Err(ValidationError::DuplicateVersion {
            package: package.to_string(),
            version: version.to_string(),
        });
    }

    let released_at = match record["releasedAt"].as_str() {
        Some(d) if rules.is_date(d) => d,
        _ => {
            return Err(ValidationError::InvalidFormat {
                package: package.to_string(),
                field: at("releasedAt"),
                expected: "YYYY-MM-DD",
            })
        }
    };

    let compiler_drop =
        record["compiler-drop"]
            .as_object()
            .ok_or_else(|| ValidationError::InvalidType {
                package: package.to_string(),
                field: at("compiler-drop"),
                expected: "an object",
            })?;

    let min = positive_int(compiler_drop.get("min")).ok_or_else(|| {
        ValidationError::InvalidValue {
            package: package.to_string(),
            field: at("compiler-drop.min"),
        }
    })?;
    let tested_on = positive_int(compiler_drop.get("tested-on")).ok_or_else(|| {
        ValidationError::InvalidValue {
            package: package.to_string(),
            field: at("compiler-drop.tested-on"),
        }
    })?;
    if tested_on < min {
        return Err(ValidationError::InvalidRange {
            package: package.to_string(),
            field: at("compiler-drop.tested-on"),
            lower: min,
        });
    }

    let source = record["source"]
        .as_object()
        .ok_or_else(|| ValidationError::InvalidType {
            package: package.to_string(),
            field: at("source"),
            expected: "an object",
        })?;

    let commit = match source.get("commit").and_then(Value::as_str) {
        Some(c) if rules.is_commit_hash(c) => c,
        _ => {
            return Err(ValidationError::InvalidFormat {
                package: package.to_string(),
                field: at("source.commit"),
                expected: "a 40-character hex string",
            })
        }
    };
    let sha256 = match source.get("sha256").and_then(Value::as_str) {
        Some(s) if rules.is_content_hash(s) => s,
        _ => {
            return Err(ValidationError::InvalidFormat {
                package: package.to_string(),
                field: at("source.sha256"),
                expected: "a 64-character hex string",
            })
        }
    };

    Ok(Release {
        version: version.to_string(),
        released_at: released_at.to_string(),
        compiler_drop: CompilerDrop { min, tested_on },
        source: SourceRef {
            commit: commit.to_string(),
            sha256: sha256.to_string(),
        },
    })
}

/// JSON integer >= 1, rejecting floats, negatives, and non-numbers
fn positive_int(value: Option<&Value>) -> Option<u64> {
    match value.and_then(Value::as_u64) {
        Some(n) if n >= 1 => Some(n),
        _ => None,
    }
}
