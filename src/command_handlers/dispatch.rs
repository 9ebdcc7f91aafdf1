use crate::cli::Commands;
use crate::command_handlers::{install, plan};
use crate::config::InstallConfig;
use anyhow::Result;

/// Runs a command and returns the process exit status.
pub async fn dispatch(cmd: Commands, cfg: &InstallConfig, quiet: bool) -> Result<u8> {
    match cmd {
        Commands::Install => Ok(install::run_install(cfg, quiet).await),
        Commands::Plan => {
            plan::print_plan(cfg)?;
            Ok(0)
        }
    }
}
