// beatpack/src/cli/package.rs
use std::fs;
use std::path::PathBuf;

use beatpack_common::config::Config;
use beatpack_common::error::Result;
use beatpack_common::model::{Architecture, ArtifactPackage, BuildConfiguration};
use beatpack_core::tree::AssembleInputs;
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Target name, e.g. lsbeat
    pub target: String,

    /// Version being packaged (resolved at the process boundary, the core
    /// never reads it from the environment)
    #[arg(long)]
    pub version: String,

    /// Target architecture
    #[arg(long, default_value = "x64")]
    pub arch: Architecture,

    /// Build configuration file with the per-product settings
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
}

impl PackageArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let build = BuildConfiguration::read(&self.config)?;
        let product = build.product(&self.target)?;

        let canonical = self.target.to_ascii_lowercase();
        let package = ArtifactPackage {
            target_name: self.target.clone(),
            canonical_target_name: canonical.clone(),
            architecture: self.arch,
            version: self.version.trim_start_matches('v').to_string(),
            url: None,
            file_name: format!("{canonical}.exe"),
        };
        info!("Packaging {}", package);

        let upgrade_code = beatpack_core::identity::derive_identity(&canonical);

        let out_dir = config.out_dir();
        fs::create_dir_all(&out_dir)?;
        let shim_path = beatpack_core::shim::write_cli_shim(&out_dir, &canonical)?;

        let staged_root = config.staged_package_dir(&canonical);
        let tree = beatpack_core::tree::assemble(&AssembleInputs {
            product,
            package: &package,
            upgrade_code,
            staged_root: &staged_root,
            extra_root: &config.extra_dir(),
            cli_shim_path: &shim_path,
        })?;

        // Hand-off point for the installer emitter: the tree model plus the
        // derived identity, serialized as one document.
        let out_path = out_dir.join(format!("{canonical}-package.json"));
        fs::write(&out_path, serde_json::to_string_pretty(&tree)?)?;

        println!(
            "Assembled package tree for {} (upgrade code {}) -> {}",
            package,
            upgrade_code,
            out_path.display()
        );
        Ok(())
    }
}
