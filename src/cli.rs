use crate::extract::ExtractMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "ae-install",
    about = "Download the prebuilt ae release for this host into <package-root>/bin"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config (defaults to ./ae-install.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Release version to fetch (falls back to the hosting package's version)
    #[arg(long = "pkg-version", env = "npm_package_version", value_name = "VERSION", global = true)]
    pub pkg_version: Option<String>,

    /// Repository hosting the releases, as OWNER/REPO
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Name of the executable inside the archive
    #[arg(long, global = true)]
    pub binary_name: Option<String>,

    /// Directory whose bin/ receives the executable
    #[arg(long, global = true)]
    pub package_root: Option<PathBuf>,

    /// Base URL of the release host
    #[arg(long, value_name = "URL", global = true)]
    pub download_base: Option<String>,

    /// Maximum number of redirects followed per download
    #[arg(long, value_name = "N", global = true)]
    pub max_redirects: Option<usize>,

    /// How archives are unpacked
    #[arg(long, value_enum, global = true)]
    pub extractor: Option<ExtractMode>,

    /// No progress spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Fetch and unpack the binary unless it is already present (default)
    #[default]
    Install,
    /// Show the resolved platform, URL and target path (no changes)
    Plan,
}
