//! Coi Package Registry Validator
//!
//! Validates package descriptors prior to their acceptance into the Coi
//! community registry: schema shape, string formats, semantic-version
//! grammar, uniqueness invariants, and (optionally) repository
//! provenance against the GitHub API.
//!
//! ## Features
//!
//! - **Offline validation**: required fields, date/hex/semver/name
//!   formats, per-package version uniqueness, filename agreement
//! - **Online provenance**: repository existence and MIT license policy,
//!   one lookup per package
//! - **Fail-fast**: the first violation aborts the run with one
//!   attributed diagnostic
//! - **Deterministic**: descriptors are processed in sorted path order,
//!   so the same registry always reports the same first failure
//!
//! ## Registry layout
//!
//! ```text
//! packages/
//! ├── coi-http.json
//! ├── coi-json.json
//! └── tools/
//!     └── coi-fmt.json
//! ```
//!
//! One descriptor per file; the file's base name is the package's
//! canonical identity.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod package;
pub mod provenance;
pub mod registry;
pub mod release;

pub use config::{ValidationMode, ValidatorConfig};
pub use descriptor::{CompilerDrop, PackageDescriptor, Release, RepositoryRef, SourceRef};
pub use error::{Result, ValidationError};
pub use format::FormatRules;
pub use package::PackageValidator;
pub use provenance::{GithubHost, RepositoryHost, RepositoryMetadata};
pub use registry::{RegistryValidator, ValidationSummary};
pub use release::validate_release;
