//! Format rules for descriptor fields
//!
//! Pure shape checks: each predicate accepts or rejects a string with no
//! side effects and no error detail. Callers attach the package and field
//! attribution when reporting a rejection.
//!
//! Dates are checked for shape only (`2024-13-99` passes) — the registry
//! does not enforce calendar validity or chronological ordering.

use regex::Regex;

/// Compiled format rules shared across one validation run
pub struct FormatRules {
    /// `YYYY-MM-DD`, digits only
    date: Regex,
    /// 40 hex characters (a full git commit id)
    commit: Regex,
    /// 64 hex characters (a SHA-256 digest)
    sha256: Regex,
    /// Package names: lowercase, 2-63 chars, `[a-z0-9._-]`, leading `[a-z0-9]`
    name: Regex,
    /// `MAJOR.MINOR.PATCH` with an optional `-prerelease` tag
    version: Regex,
    /// Exactly an owner/repo pair on github.com, optional trailing slash
    repository: Regex,
}

impl FormatRules {
    pub fn new() -> Self {
        Self {
            date: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
            commit: Regex::new(r"^[a-fA-F0-9]{40}$").unwrap(),
            sha256: Regex::new(r"^[a-fA-F0-9]{64}$").unwrap(),
            name: Regex::new(r"^[a-z0-9][a-z0-9._-]{1,62}$").unwrap(),
            version: Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(-[a-zA-Z0-9.]+)?$").unwrap(),
            repository: Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/?$").unwrap(),
        }
    }

    pub fn is_date(&self, value: &str) -> bool {
        self.date.is_match(value)
    }

    pub fn is_commit_hash(&self, value: &str) -> bool {
        self.commit.is_match(value)
    }

    pub fn is_content_hash(&self, value: &str) -> bool {
        self.sha256.is_match(value)
    }

    pub fn is_package_name(&self, value: &str) -> bool {
        self.name.is_match(value)
    }

    pub fn is_semver(&self, value: &str) -> bool {
        self.version.is_match(value)
    }

    /// Split a repository URL into its `(owner, repo)` pair.
    ///
    /// Returns `None` for anything that is not exactly an owner/repo pair
    /// on github.com over https — extra path segments, other hosts, and
    /// other schemes are all rejected. A trailing `.git` on the repo
    /// segment is stripped.
    pub fn split_repository(&self, url: &str) -> Option<(String, String)> {
        let captures = self.repository.captures(url)?;
        let owner = captures[1].to_string();
        let repo = &captures[2];
        let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
        Some((owner, repo))
    }
}

impl Default for FormatRules {
    fn default() -> Self {
        Self::new()
    }
}
