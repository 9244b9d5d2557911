// beatpack/src/main.rs
use std::process;

use beatpack_common::config::Config;
use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let level_filter = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("BEATPACK_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            process::exit(1);
        }
    };

    // Fail fast, fail loud: nothing below recovers or retries.
    if let Err(e) = args.command.run(&config).await {
        eprintln!("{}: {e:#}", "Error".red().bold());
        process::exit(1);
    }
}
