use crate::config::InstallConfig;
use crate::installer::Installer;
use anyhow::{Context, Result};

pub fn print_plan(cfg: &InstallConfig) -> Result<()> {
    for line in plan_lines(&Installer::new(cfg.clone()))? {
        println!("{line}");
    }
    Ok(())
}

fn plan_lines(installer: &Installer) -> Result<Vec<String>> {
    let cfg = installer.config();
    let release = installer.release().context("resolving host platform")?;
    let bin = installer.binary_path();
    let state = if bin.exists() { "installed (install will skip)" } else { "not installed" };
    Ok(vec![
        format!("{} v{} for {}", cfg.binary_name, release.version, release.platform),
        format!("url:      {}", installer.download_url(&release)),
        format!("binary:   {} [{state}]", bin.display()),
        format!("fallback: {}", cfg.releases_page()),
    ])
}
