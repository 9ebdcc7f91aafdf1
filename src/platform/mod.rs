pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

use crate::error::InstallError;
use std::fmt;
use std::path::Path;

/// Filesystem operations whose behaviour depends on the OS we were compiled for.
pub trait PlatformOps: Sync + Send {
    fn make_executable(&self, path: &Path) -> Result<(), std::io::Error>;
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    fn from_host(raw: &str) -> Option<Self> {
        match raw {
            "macos" | "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" | "win32" => Some(Os::Windows),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    fn from_host(raw: &str) -> Option<Self> {
        match raw {
            "x86_64" | "amd64" | "x64" => Some(Arch::Amd64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

/// Host platform expressed in the release naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSpec {
    pub os: Os,
    pub arch: Arch,
}

impl fmt::Display for PlatformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Raw OS/arch identifiers as reported by the host, before any mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub os: String,
    pub arch: String,
}

impl HostTarget {
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self { os: os.into(), arch: arch.into() }
    }

    pub fn is_windows(&self) -> bool {
        Os::from_host(&self.os) == Some(Os::Windows)
    }

    /// File name the installed binary gets on this host.
    pub fn executable_name(&self, base: &str) -> String {
        if self.is_windows() && !base.ends_with(".exe") {
            format!("{base}.exe")
        } else {
            base.to_string()
        }
    }

    pub fn resolve(&self) -> Result<PlatformSpec, InstallError> {
        resolve(&self.os, &self.arch)
    }
}

/// Map host identifiers onto the release naming convention.
///
/// Both sides must have an entry; there is no fallback for unknown values.
pub fn resolve(host_os: &str, host_arch: &str) -> Result<PlatformSpec, InstallError> {
    match (Os::from_host(host_os), Arch::from_host(host_arch)) {
        (Some(os), Some(arch)) => Ok(PlatformSpec { os, arch }),
        _ => Err(InstallError::UnsupportedPlatform {
            os: host_os.to_string(),
            arch: host_arch.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_pairs_resolve() {
        let cases = [
            ("macos", "x86_64", Os::Darwin, Arch::Amd64),
            ("darwin", "arm64", Os::Darwin, Arch::Arm64),
            ("linux", "x86_64", Os::Linux, Arch::Amd64),
            ("linux", "aarch64", Os::Linux, Arch::Arm64),
            ("windows", "x86_64", Os::Windows, Arch::Amd64),
            ("win32", "x64", Os::Windows, Arch::Amd64),
            ("windows", "aarch64", Os::Windows, Arch::Arm64),
        ];
        for (host_os, host_arch, os, arch) in cases {
            let spec = resolve(host_os, host_arch).unwrap();
            assert_eq!(spec, PlatformSpec { os, arch }, "{host_os}-{host_arch}");
        }
    }

    #[test]
    fn unsupported_pairs_fail_with_raw_identifiers() {
        for (host_os, host_arch) in [
            ("freebsd", "x86_64"),
            ("linux", "x86"),
            ("linux", "riscv64"),
            ("android", "aarch64"),
            ("", ""),
        ] {
            match resolve(host_os, host_arch) {
                Err(InstallError::UnsupportedPlatform { os, arch }) => {
                    assert_eq!(os, host_os);
                    assert_eq!(arch, host_arch);
                }
                other => panic!("expected unsupported platform for {host_os}-{host_arch}, got {other:?}"),
            }
        }
    }

    #[test]
    fn executable_name_follows_host_os() {
        assert_eq!(HostTarget::new("windows", "x86_64").executable_name("ae"), "ae.exe");
        assert_eq!(HostTarget::new("windows", "x86_64").executable_name("ae.exe"), "ae.exe");
        assert_eq!(HostTarget::new("linux", "aarch64").executable_name("ae"), "ae");
        assert_eq!(HostTarget::new("macos", "aarch64").executable_name("ae"), "ae");
    }

    #[test]
    fn display_uses_release_tags() {
        let spec = resolve("macos", "aarch64").unwrap();
        assert_eq!(spec.to_string(), "darwin-arm64");
    }

    #[test]
    fn current_host_is_supported_on_release_targets() {
        if cfg!(any(target_arch = "x86_64", target_arch = "aarch64"))
            && cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows"))
        {
            assert!(HostTarget::current().resolve().is_ok());
        }
    }
}
