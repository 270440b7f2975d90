mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use ftradar_core::RadarConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

const DEFAULT_LOG_FILTER: &str = "ftradar=info,ftradar_core=info,ftradar_web=info";
const VERBOSE_LOG_FILTER: &str = "ftradar=debug,ftradar_core=debug,ftradar_web=debug";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = RadarConfig::from_env();
    tracing::debug!(?config, "configuration resolved");
    commands::run(&config, cli.command)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
