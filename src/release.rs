use crate::platform::{Os, PlatformSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    pub fn for_os(os: Os) -> Self {
        match os {
            Os::Windows => ArchiveFormat::Zip,
            Os::Darwin | Os::Linux => ArchiveFormat::TarGz,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

/// One published archive: version plus the platform it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub version: String,
    pub platform: PlatformSpec,
    pub format: ArchiveFormat,
}

impl ReleaseDescriptor {
    pub fn new(version: &str, platform: PlatformSpec) -> Self {
        Self {
            version: normalize_version(version),
            platform,
            format: ArchiveFormat::for_os(platform.os),
        }
    }

    /// `<binary>_<version>_<os>_<arch>.<ext>`
    pub fn artifact_name(&self, binary_name: &str) -> String {
        format!(
            "{binary_name}_{v}_{os}_{arch}.{ext}",
            v = self.version,
            os = self.platform.os.as_str(),
            arch = self.platform.arch.as_str(),
            ext = self.format.extension()
        )
    }

    pub fn download_url(&self, base: &str, repo: &str, binary_name: &str) -> String {
        format!(
            "{base}/{repo}/releases/download/v{v}/{artifact}",
            base = base.trim_end_matches('/'),
            repo = repo.trim_matches('/'),
            v = self.version,
            artifact = self.artifact_name(binary_name)
        )
    }
}

pub fn build_url(base: &str, repo: &str, binary_name: &str, version: &str, platform: PlatformSpec) -> String {
    ReleaseDescriptor::new(version, platform).download_url(base, repo, binary_name)
}

/// Release listing page, offered as the manual fallback.
pub fn releases_page(base: &str, repo: &str) -> String {
    format!("{}/{}/releases", base.trim_end_matches('/'), repo.trim_matches('/'))
}

// Tags are always rendered as v<version>; accept either spelling as input.
pub fn normalize_version(version: &str) -> String {
    let v = version.trim();
    v.strip_prefix('v').unwrap_or(v).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{resolve, Arch};

    const GH: &str = "https://github.com";

    #[test]
    fn linux_amd64_url() {
        let p = resolve("linux", "x86_64").unwrap();
        assert_eq!(
            build_url(GH, "owner/repo", "ae", "1.2.3", p),
            "https://github.com/owner/repo/releases/download/v1.2.3/ae_1.2.3_linux_amd64.tar.gz"
        );
    }

    #[test]
    fn windows_arm64_url_uses_zip() {
        let p = resolve("windows", "aarch64").unwrap();
        assert_eq!(
            build_url(GH, "owner/repo", "ae", "1.2.3", p),
            "https://github.com/owner/repo/releases/download/v1.2.3/ae_1.2.3_windows_arm64.zip"
        );
    }

    #[test]
    fn every_platform_appears_in_its_url() {
        for os in [Os::Darwin, Os::Linux, Os::Windows] {
            for arch in [Arch::Amd64, Arch::Arm64] {
                let url = build_url(GH, "owner/repo", "ae", "0.4.0", PlatformSpec { os, arch });
                let needle = format!("_{}_{}.", os.as_str(), arch.as_str());
                assert!(url.contains(&needle), "{url} missing {needle}");
                assert_eq!(url.ends_with(".zip"), os == Os::Windows, "{url}");
            }
        }
    }

    #[test]
    fn leading_v_is_not_doubled() {
        let p = resolve("macos", "aarch64").unwrap();
        assert_eq!(
            build_url("https://github.com/", "owner/repo", "ae", " v2.0.0 ", p),
            "https://github.com/owner/repo/releases/download/v2.0.0/ae_2.0.0_darwin_arm64.tar.gz"
        );
    }

    #[test]
    fn releases_page_points_at_listing() {
        assert_eq!(releases_page(GH, "owner/repo"), "https://github.com/owner/repo/releases");
    }
}
