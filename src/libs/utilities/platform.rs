// Our custom logging macros.
use crate::log_debug;

/// The operating system and CPU architecture downloads are resolved for.
///
/// Both values are stored in their normalized form (see [`normalize_os`] and
/// [`normalize_arch`]) so that tests can build a Windows platform on a Linux
/// machine and exercise the Windows install path without touching the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    os: String,
    arch: String,
}

impl HostPlatform {
    pub fn new(os: &str, arch: &str) -> Self {
        HostPlatform {
            os: normalize_os(os),
            arch: normalize_arch(arch),
        }
    }

    /// The platform this binary was compiled for.
    /// `std::env::consts` reflects the compilation target, which is reliable for the running binary.
    pub fn current() -> Self {
        let platform = HostPlatform::new(std::env::consts::OS, std::env::consts::ARCH);
        log_debug!("[Platform] Host resolved to {} (os={}, arch={})", platform, platform.os(), platform.arch());
        platform
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// Platform token used in distribution file names (`win`, `darwin`, `linux`, ...).
    pub fn platform_token(&self) -> &str {
        match self.os.as_str() {
            "windows" => "win",
            "macos" => "darwin",
            other => other,
        }
    }

    /// Architecture token used in distribution file names (`x64`, `arm64`, `x86`, ...).
    pub fn arch_token(&self) -> &str {
        match self.arch.as_str() {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            "x86" => "x86",
            other => other,
        }
    }

    /// Extension of the single-archive distribution for this platform.
    pub fn archive_extension(&self) -> &'static str {
        if self.is_windows() { "zip" } else { "tar.gz" }
    }

    /// Adds `.exe` on Windows.
    pub fn executable_name(&self, name: &str) -> String {
        if self.is_windows() {
            format!("{name}.exe")
        } else {
            name.to_string()
        }
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.platform_token(), self.arch_token())
    }
}

/// Normalizes operating system spellings into the names `std::env::consts::OS` uses.
///
/// Unknown values are lowercased and kept; they are passed through to download
/// URLs unchanged, which is what the mirror expects for e.g. `aix` or `sunos`.
pub fn normalize_os(os: &str) -> String {
    match os.to_lowercase().as_str() {
        "macos" | "darwin" | "apple-darwin" | "osx" => "macos".to_string(),
        "windows" | "win" | "win32" | "win64" => "windows".to_string(),
        other => other.to_string(),
    }
}

/// Normalizes CPU architecture spellings into the names `std::env::consts::ARCH` uses.
pub fn normalize_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "amd64" | "x86_64" | "x64" => "x86_64".to_string(),
        "arm64" | "aarch64" => "aarch64".to_string(),
        "i386" | "i686" | "x86" | "386" => "x86".to_string(),
        other => other.to_string(),
    }
}
