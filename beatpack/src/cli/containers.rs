// beatpack/src/cli/containers.rs
use beatpack_common::config::Config;
use beatpack_common::error::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ContainersArgs {}

impl ContainersArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let containers = beatpack_net::catalog::list_named_containers(config).await?;
        for container in &containers {
            println!("{:<8} {}", container.kind.to_string(), container.name);
        }
        Ok(())
    }
}
