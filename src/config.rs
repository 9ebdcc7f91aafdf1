use crate::cli::Cli;
use crate::extract::ExtractMode;
use crate::fetch::DEFAULT_MAX_REDIRECTS;
use crate::release;
use anyhow::{Context, Result};
use fs_err as fs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ae-install.toml";

/// Everything the installer needs, resolved before the pipeline starts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    /// `<owner>/<repo>` hosting the releases
    pub repo: String,
    pub binary_name: String,
    pub version: String,
    /// Scheme and host the release paths hang off
    pub download_base: String,
    /// Directory that receives `bin/`
    pub package_root: PathBuf,
    pub max_redirects: usize,
    pub extractor: ExtractMode,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            repo: "shanepadgett/agent-extensions".to_string(),
            binary_name: "ae".to_string(),
            version: "0.1.0".to_string(),
            download_base: "https://github.com".to_string(),
            package_root: PathBuf::from("."),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            extractor: ExtractMode::Native,
        }
    }
}

impl InstallConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Defaults, then the config file, then CLI flags (which already carry the env fallback).
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        cfg.apply_overrides(cli);
        Ok(cfg)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(v) = &cli.pkg_version {
            self.version = v.clone();
        }
        if let Some(r) = &cli.repo {
            self.repo = r.clone();
        }
        if let Some(b) = &cli.binary_name {
            self.binary_name = b.clone();
        }
        if let Some(base) = &cli.download_base {
            self.download_base = base.clone();
        }
        if let Some(root) = &cli.package_root {
            self.package_root = root.clone();
        }
        if let Some(n) = cli.max_redirects {
            self.max_redirects = n;
        }
        if let Some(mode) = cli.extractor {
            self.extractor = mode;
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.package_root.join("bin")
    }

    pub fn releases_page(&self) -> String {
        release::releases_page(&self.download_base, &self.repo)
    }
}
