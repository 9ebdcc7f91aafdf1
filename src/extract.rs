use crate::error::ExtractionError;
use crate::release::ArchiveFormat;
use flate2::read::GzDecoder;
use fs_err as fs;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tar::Archive;
use tracing::debug;
use zip::ZipArchive;

/// How release archives get unpacked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Decode in-process (tar + gzip, zip)
    #[default]
    Native,
    /// Shell out to the platform utility (tar, PowerShell Expand-Archive)
    System,
}

/// Unpacks an archive file into a destination directory, overwriting existing entries.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError>;
}

pub fn extractor_for(format: ArchiveFormat, mode: ExtractMode) -> Box<dyn Extractor> {
    match (mode, format) {
        (ExtractMode::Native, ArchiveFormat::TarGz) => Box::new(TarGzExtractor),
        (ExtractMode::Native, ArchiveFormat::Zip) => Box::new(ZipExtractor),
        (ExtractMode::System, format) => Box::new(SystemExtractor::new(format)),
    }
}

pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    fn name(&self) -> &'static str {
        "tar.gz"
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let file = fs::File::open(archive)?;
        let mut tar = Archive::new(GzDecoder::new(file));
        tar.set_overwrite(true);
        tar.unpack(dest)?;
        Ok(())
    }
}

pub struct ZipExtractor;

impl Extractor for ZipExtractor {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let file = fs::File::open(archive)?;
        let mut zip = ZipArchive::new(file)?;

        // Validate every name up front so a hostile archive writes nothing.
        let mut targets: Vec<PathBuf> = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let entry = zip.by_index(i)?;
            match entry.enclosed_name() {
                Some(rel) => targets.push(dest.join(rel)),
                None => return Err(ExtractionError::UnsafeEntry { name: entry.name().to_string() }),
            }
        }

        for (i, out_path) in targets.iter().enumerate() {
            let mut entry = zip.by_index(i)?;
            if entry.is_dir() {
                fs::create_dir_all(out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(out_path)?;
            std::io::copy(&mut entry, &mut out)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(out_path, std::fs::Permissions::from_mode(mode & 0o7777))?;
                }
            }
        }
        Ok(())
    }
}

/// Delegates to `tar` or PowerShell `Expand-Archive`, inheriting stdio.
pub struct SystemExtractor {
    format: ArchiveFormat,
    /// Looked up instead of `PATH` when set.
    search_path: Option<OsString>,
}

impl SystemExtractor {
    pub fn new(format: ArchiveFormat) -> Self {
        Self { format, search_path: None }
    }

    #[cfg(test)]
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    fn locate(&self, tool: &str) -> Result<PathBuf, ExtractionError> {
        let found = match &self.search_path {
            Some(paths) => which::which_in(tool, Some(paths), std::env::current_dir()?),
            None => which::which(tool),
        };
        found.map_err(|_| ExtractionError::ToolUnavailable { tool: tool.to_string() })
    }

    fn command_line(&self, archive: &Path, dest: &Path) -> (&'static str, Vec<OsString>) {
        match self.format {
            ArchiveFormat::TarGz => (
                "tar",
                vec!["-xzf".into(), archive.into(), "-C".into(), dest.into()],
            ),
            ArchiveFormat::Zip => (
                "powershell",
                vec![
                    "-NoProfile".into(),
                    "-NonInteractive".into(),
                    "-Command".into(),
                    format!(
                        "Expand-Archive -LiteralPath '{}' -DestinationPath '{}' -Force",
                        ps_quote(archive),
                        ps_quote(dest)
                    )
                    .into(),
                ],
            ),
        }
    }
}

impl Extractor for SystemExtractor {
    fn name(&self) -> &'static str {
        match self.format {
            ArchiveFormat::TarGz => "tar",
            ArchiveFormat::Zip => "powershell",
        }
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let (tool, args) = self.command_line(archive, dest);
        let program = self.locate(tool)?;
        debug!(program = %program.display(), ?args, "running extraction tool");
        let status = Command::new(&program).args(&args).status()?;
        if !status.success() {
            return Err(ExtractionError::ToolFailed { tool: tool.to_string(), code: status.code() });
        }
        Ok(())
    }
}

// Single-quoted PowerShell literal: the only escape is a doubled quote.
fn ps_quote(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    pub fn tar_gz(entries: &[(&str, &str, u32)]) -> Vec<u8> {
        let enc = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(enc);
        for (name, data, mode) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(data.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    pub fn zip(entries: &[(&str, &str, u32)]) -> Vec<u8> {
        let mut w = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data, mode) in entries {
            let opts = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .unix_permissions(*mode);
            w.start_file(*name, opts).unwrap();
            w.write_all(data.as_bytes()).unwrap();
        }
        w.finish().unwrap().into_inner()
    }
}
