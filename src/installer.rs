use crate::config::InstallConfig;
use crate::error::InstallError;
use crate::extract::extractor_for;
use crate::fetch::{Fetcher, Payload};
use crate::platform::{platform, HostTarget, Os};
use crate::release::{build_url, ArchiveFormat, ReleaseDescriptor};
use fs_err as fs;
use indicatif::ProgressBar;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, TempPath};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled(PathBuf),
    Installed(PathBuf),
}

pub struct Installer {
    config: InstallConfig,
    host: HostTarget,
}

impl Installer {
    pub fn new(config: InstallConfig) -> Self {
        Self { config, host: HostTarget::current() }
    }

    pub fn with_host(mut self, host: HostTarget) -> Self {
        self.host = host;
        self
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Deterministic install location; its existence means "already installed".
    pub fn binary_path(&self) -> PathBuf {
        self.config.bin_dir().join(self.host.executable_name(&self.config.binary_name))
    }

    pub fn release(&self) -> Result<ReleaseDescriptor, InstallError> {
        let platform = self.host.resolve()?;
        Ok(ReleaseDescriptor::new(&self.config.version, platform))
    }

    pub fn download_url(&self, release: &ReleaseDescriptor) -> String {
        let cfg = &self.config;
        build_url(&cfg.download_base, &cfg.repo, &cfg.binary_name, &release.version, release.platform)
    }

    pub async fn install(&self, pb: Option<&ProgressBar>) -> Result<InstallOutcome, InstallError> {
        let name = &self.config.binary_name;
        let bin_path = self.binary_path();
        if bin_path.exists() {
            announce(pb, format!("{name} binary already exists, skipping download"));
            return Ok(InstallOutcome::AlreadyInstalled(bin_path));
        }

        let release = self.release()?;
        let url = self.download_url(&release);
        announce(pb, format!("Downloading {name} v{} for {}...", release.version, release.platform));
        announce(pb, format!("URL: {url}"));

        if let Some(p) = pb {
            p.set_message(format!("GET {name}"));
        }
        let payload = Fetcher::new(self.config.max_redirects)?.fetch(&url).await?;

        let bin_dir = self.config.bin_dir();
        ensure_dir(&bin_dir)?;
        if let Some(p) = pb {
            p.set_message(format!("Extract {name}"));
        }
        let staging = self.unpack(payload, release.format, &bin_dir)?;

        let file_name = self.host.executable_name(name);
        let staged_bin = staging.path().join(&file_name);
        if !staged_bin.is_file() {
            return Err(InstallError::BinaryMissing { path: bin_path });
        }
        if release.platform.os != Os::Windows {
            platform().make_executable(&staged_bin)?;
        }
        promote(staging.path(), &bin_dir, &file_name)?;
        if let Err(err) = staging.close() {
            warn!(%err, "could not remove staging directory");
        }
        info!(path = %bin_path.display(), version = %release.version, "installed");
        Ok(InstallOutcome::Installed(bin_path))
    }

    /// Extracts into a staging directory under `bin_dir`; nothing lands next to the
    /// binary path until the whole archive has been read.
    fn unpack(&self, payload: Payload, format: ArchiveFormat, bin_dir: &Path) -> Result<TempDir, InstallError> {
        let name = &self.config.binary_name;
        let temp = write_temp_archive(bin_dir, name, format, &payload)?;
        drop(payload);
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{name}-staging-"))
            .tempdir_in(bin_dir)?;
        let extractor = extractor_for(format, self.config.extractor);
        debug!(archive = %temp.display(), staging = %staging.path().display(), extractor = extractor.name(), "extracting");
        let extracted = extractor.extract(&temp, staging.path());
        // Removal must happen before the extraction result propagates.
        if let Err(err) = temp.close() {
            warn!(%err, "could not remove temporary archive");
        }
        extracted?;
        Ok(staging)
    }
}

// The binary moves last so its presence implies the rest of the archive is in place.
fn promote(staging: &Path, dest: &Path, binary: &str) -> Result<(), InstallError> {
    let mut names = fs::read_dir(staging)?
        .map(|e| e.map(|e| e.file_name()))
        .collect::<Result<Vec<OsString>, _>>()?;
    names.sort_by_key(|n| n.as_os_str() == OsStr::new(binary));
    for n in names {
        move_entry(&staging.join(&n), &dest.join(&n))?;
    }
    Ok(())
}

// Overwrite semantics: directories merge, anything else replaces what is there.
fn move_entry(from: &Path, to: &Path) -> std::io::Result<()> {
    if from.is_dir() && to.is_dir() {
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            move_entry(&entry.path(), &to.join(entry.file_name()))?;
        }
        return Ok(());
    }
    if to.is_dir() {
        fs::remove_dir_all(to)?;
    } else if to.symlink_metadata().is_ok() {
        fs::remove_file(to)?;
    }
    fs::rename(from, to)
}

fn announce(pb: Option<&ProgressBar>, msg: String) {
    match pb {
        Some(p) => p.println(msg),
        None => println!("{msg}"),
    }
}

fn ensure_dir(p: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(p)?;
    Ok(())
}

// Named apart from the binary so a failed run cannot be mistaken for an install.
fn write_temp_archive(
    dir: &Path,
    binary_name: &str,
    format: ArchiveFormat,
    payload: &Payload,
) -> Result<TempPath, InstallError> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!(".{binary_name}-download-"))
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(dir)?;
    file.write_all(payload.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}
