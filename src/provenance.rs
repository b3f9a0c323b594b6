//! GitHub repository metadata lookups
//!
//! Online validation asks the hosting platform one question per package:
//! "does `owner/repo` exist, and what license does it declare?". The
//! [`RepositoryHost`] trait is the seam — production code plugs in
//! [`GithubHost`], tests plug in a fake and never touch the network.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// User-Agent sent with every API request (GitHub rejects agent-less calls)
const USER_AGENT: &str = "coi-registry-validator";

/// Errors from the hosting-platform API
///
/// A single lookup either completes or fails; there is no retry. Both
/// variants surface as `ProvenanceUnavailable` at the validation layer.
#[derive(Error, Debug)]
pub enum HostError {
    /// The API answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// The request never completed (connect failure, timeout, bad body)
    #[error("{0}")]
    Transport(String),
}

impl HostError {
    /// HTTP status of the failed lookup, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Transport(_) => None,
        }
    }
}

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryMetadata {
    #[serde(default)]
    pub license: Option<LicenseInfo>,
}

/// The `license` object inside the repository response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseInfo {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

impl RepositoryMetadata {
    /// SPDX identifier of the declared license, if the platform reports one
    pub fn spdx_id(&self) -> Option<&str> {
        self.license.as_ref().and_then(|l| l.spdx_id.as_deref())
    }
}

/// A hosting platform that can answer repository metadata lookups
pub trait RepositoryHost {
    fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, HostError>;
}

/// GitHub API client
///
/// One synchronous request per lookup with a fixed timeout. The bearer
/// token is optional — without it the call runs unauthenticated under
/// GitHub's stricter anonymous rate limits.
pub struct GithubHost {
    client: reqwest::blocking::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubHost {
    pub fn new(
        api_base: impl Into<String>,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, HostError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| HostError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            token,
        })
    }
}

impl RepositoryHost for GithubHost {
    fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, HostError> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_base.trim_end_matches('/'),
            owner,
            repo
        );
        tracing::debug!(%url, "repository metadata lookup");

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|err| HostError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }

        response
            .json::<RepositoryMetadata>()
            .map_err(|err| HostError::Transport(err.to_string()))
    }
}
