mod cli;
mod command_handlers;
mod config;
mod error;
mod extract;
mod fetch;
mod installer;
mod logging;
mod platform;
mod release;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::config::InstallConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    logging::init_logging();
    let cli = Cli::parse();
    let cfg = InstallConfig::from_cli(&cli)?;
    let code = command_handlers::dispatch::dispatch(cli.command.unwrap_or_default(), &cfg, cli.quiet).await?;
    Ok(ExitCode::from(code))
}
