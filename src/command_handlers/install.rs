use crate::config::InstallConfig;
use crate::error::InstallError;
use crate::installer::{InstallOutcome, Installer};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub async fn run_install(cfg: &InstallConfig, quiet: bool) -> u8 {
    install_and_report(&Installer::new(cfg.clone()), quiet).await
}

async fn install_and_report(installer: &Installer, quiet: bool) -> u8 {
    let pb = (!quiet).then(spinner);
    let res = installer.install(pb.as_ref()).await;
    if let Some(p) = &pb {
        p.finish_and_clear();
    }
    report(res, installer.config())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Single place pipeline failures are turned into user output and an exit status.
pub fn report(res: Result<InstallOutcome, InstallError>, cfg: &InstallConfig) -> u8 {
    match res {
        Ok(InstallOutcome::Installed(_)) => {
            println!("{} installed successfully!", cfg.binary_name);
            0
        }
        Ok(InstallOutcome::AlreadyInstalled(_)) => 0,
        Err(e) => {
            let e = anyhow::Error::from(e);
            eprintln!("Failed to install {}: {e:#}", cfg.binary_name);
            eprintln!("You can manually download from: {}", cfg.releases_page());
            1
        }
    }
}
