//! Registry Validator CLI
//!
//! Validates every package descriptor under the registry root and exits
//! non-zero on the first violation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use coi_registry::provenance::GithubHost;
use coi_registry::{
    PackageValidator, RegistryValidator, ValidationSummary, ValidatorConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "registry-validator")]
#[command(about = "Validate Coi registry package descriptors")]
struct Cli {
    /// Path to the registry root (overrides config)
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Skip GitHub-derived checks (repository existence, license)
    #[arg(long)]
    offline: bool,

    /// Explicit config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(summary) => {
            println!(
                "✅ Registry is valid ({} packages, {} checks)",
                summary.packages, summary.mode
            );
        }
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ValidationSummary> {
    let config = ValidatorConfig::load_from(cli.config.as_deref().and_then(Path::to_str))?;
    let root = cli.registry.unwrap_or_else(|| config.registry.path.clone());

    let summary = if cli.offline {
        RegistryValidator::new(root, PackageValidator::offline()).validate()?
    } else {
        let token = ValidatorConfig::token_from_env();
        let host = GithubHost::new(
            config.provenance.api_base.as_str(),
            Duration::from_secs(config.provenance.timeout_secs),
            token,
        )?;
        RegistryValidator::new(root, PackageValidator::online(&host)).validate()?
    };

    Ok(summary)
}
