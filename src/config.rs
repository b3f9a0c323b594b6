//! Configuration for the registry validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (registry.toml)
//! - Environment variables (REGISTRY_*)
//!
//! ## Example config file (registry.toml):
//! ```toml
//! [registry]
//! path = "packages"
//!
//! [provenance]
//! api_base = "https://api.github.com"
//! timeout_secs = 30
//! ```
//!
//! The GitHub bearer token is deliberately NOT part of the config file —
//! it is read once from the `GITHUB_TOKEN` environment variable by the
//! CLI layer and injected into the provenance client, so validation
//! logic never does implicit environment lookups.

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the optional GitHub bearer token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Which tier of checks a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Syntactic and semantic checks on descriptor content only
    Offline,
    /// Offline checks plus one provenance lookup per package
    #[default]
    Online,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Offline => write!(f, "offline"),
            ValidationMode::Online => write!(f, "online"),
        }
    }
}

/// Main configuration for the validator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidatorConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Provenance lookup settings
    #[serde(default)]
    pub provenance: ProvenanceConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory containing the package descriptor files
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

/// Provenance lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceConfig {
    /// Base URL of the hosting platform API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout; an overrun counts as a transport failure
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_registry_path() -> PathBuf {
    PathBuf::from("packages")
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        for location in ["registry.toml", ".registry.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (REGISTRY_*)
        builder = builder.add_source(
            Environment::with_prefix("REGISTRY")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Read the optional bearer token from the environment.
    ///
    /// Absence is not an error — the provenance lookup degrades to
    /// unauthenticated requests.
    pub fn token_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.registry.path, PathBuf::from("packages"));
        assert_eq!(config.provenance.api_base, "https://api.github.com");
        assert_eq!(config.provenance.timeout_secs, 30);
    }

    #[test]
    fn test_default_mode_is_online() {
        assert_eq!(ValidationMode::default(), ValidationMode::Online);
        assert_eq!(ValidationMode::Offline.to_string(), "offline");
        assert_eq!(ValidationMode::Online.to_string(), "online");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ValidatorConfig = serde_json::from_str(
            r#"{ "provenance": { "timeout_secs": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.provenance.timeout_secs, 5);
        assert_eq!(config.provenance.api_base, "https://api.github.com");
        assert_eq!(config.registry.path, PathBuf::from("packages"));
    }
}
