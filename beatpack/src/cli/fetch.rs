// beatpack/src/cli/fetch.rs
use beatpack_common::config::Config;
use beatpack_common::error::{BeatpackError, Result};
use beatpack_common::model::{Architecture, ConstraintKey};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Target name, e.g. lsbeat
    pub target: String,

    /// Release version to fetch
    #[arg(long)]
    pub version: String,

    /// Target architecture
    #[arg(long, default_value = "x64")]
    pub arch: Architecture,

    /// Re-download even when the artifact is already present
    #[arg(long)]
    pub force: bool,
}

impl FetchArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let arch = self.arch;
        let matched = beatpack_net::resolve::find_artifact(
            config,
            &self.target,
            &self.version,
            |filter| {
                filter.set_constraint(ConstraintKey::Architecture, arch.to_string());
            },
        )?;

        let package = matched.into_iter().next().ok_or_else(|| {
            BeatpackError::NotFound(format!(
                "No artifact matches '{}' {} ({})",
                self.target, self.version, self.arch
            ))
        })?;
        info!("Resolved {}", package);

        let result =
            beatpack_net::fetch::fetch_artifact(&config.in_dir(), &package, self.force).await?;
        if result.was_already_present {
            println!("Already present: {}", result.local_path.display());
        } else {
            println!("Fetched: {}", result.local_path.display());
        }
        Ok(())
    }
}
