// beatpack/src/cli.rs
//! Defines the command-line argument structure using clap.
use beatpack_common::config::Config;
use beatpack_common::error::Result;
use clap::{ArgAction, Parser, Subcommand};

// Module declarations
pub mod containers;
pub mod fetch;
pub mod package;

use crate::cli::containers::ContainersArgs;
use crate::cli::fetch::FetchArgs;
use crate::cli::package::PackageArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "beatpack", bin_name = "beatpack")]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the named containers the remote catalog publishes
    Containers(ContainersArgs),
    /// Resolve and download one artifact
    Fetch(FetchArgs),
    /// Assemble the installer package tree for a staged artifact
    Package(PackageArgs),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Containers(command) => command.run(config).await,
            Self::Fetch(command) => command.run(config).await,
            Self::Package(command) => command.run(config).await,
        }
    }
}
