//! Version normalization, download URLs and download-strategy detection.
//!
//! Unix platforms always get a single `.tar.gz` per version. Windows is the
//! odd one out: old releases were published as loose `node.exe` (plus npm
//! scripts) without a wrapping archive, so the strategy has to be discovered
//! by probing the mirror.

use crate::errors::Result;
use crate::libs::utilities::assets::Downloader;
use crate::libs::utilities::platform::HostPlatform;
use crate::log_debug;
use crate::schemas::config::Config;
use crate::schemas::version::VersionId;

/// How a version can be obtained for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStrategy {
    /// One compressed archive contains the full toolchain.
    SingleArchive,
    /// Loose executables and scripts, no wrapping archive. `available` holds
    /// the names from [`WINDOWS_BINARIES`] that answered the probe.
    IndividualBinaries { available: Vec<&'static str> },
    Unsupported,
}

/// A Windows file that may be published next to (or instead of) the zip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsBinary {
    pub file_name: &'static str,
    /// Missing required files abort the install; optional ones are skipped.
    pub required: bool,
}

/// The core executable first, then the package-manager launchers.
pub const WINDOWS_BINARIES: [WindowsBinary; 5] = [
    WindowsBinary { file_name: "node.exe", required: true },
    WindowsBinary { file_name: "npm", required: false },
    WindowsBinary { file_name: "npm.cmd", required: false },
    WindowsBinary { file_name: "npx", required: false },
    WindowsBinary { file_name: "npx.cmd", required: false },
];

/// Availability of the six Windows candidate files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResults {
    pub zip: bool,
    /// Names from [`WINDOWS_BINARIES`] that answered the probe.
    pub binaries: Vec<&'static str>,
}

impl ProbeResults {
    pub fn has(&self, file_name: &str) -> bool {
        self.binaries.iter().any(|name| *name == file_name)
    }

    /// Zip wins over loose binaries; loose binaries need at least `node.exe`.
    pub fn strategy(&self) -> DownloadStrategy {
        if self.zip {
            DownloadStrategy::SingleArchive
        } else if self.has("node.exe") {
            DownloadStrategy::IndividualBinaries {
                available: self.binaries.clone(),
            }
        } else {
            DownloadStrategy::Unsupported
        }
    }
}

/// `{dist_url}/{v}/node-{v}-{platform}-{arch}.{ext}`
pub fn download_url(dist_url: &str, version: &VersionId, platform: &HostPlatform) -> String {
    format!(
        "{dist_url}/{version}/node-{version}-{}-{}.{}",
        platform.platform_token(),
        platform.arch_token(),
        platform.archive_extension()
    )
}

/// Resolves URLs and strategies against the configured mirror.
pub struct VersionResolver<'a> {
    config: &'a Config,
    downloader: &'a dyn Downloader,
}

impl<'a> VersionResolver<'a> {
    pub fn new(config: &'a Config, downloader: &'a dyn Downloader) -> Self {
        VersionResolver { config, downloader }
    }

    /// Normalized and checked to be usable as a directory name.
    pub fn normalize(&self, input: &str) -> Result<VersionId> {
        VersionId::parse(input)
    }

    /// Single-archive URL for the configured host platform.
    pub fn download_url(&self, version: &VersionId) -> String {
        download_url(&self.config.dist_url, version, &self.config.platform)
    }

    /// Windows zip URL, regardless of the configured platform.
    pub fn windows_zip_url(&self, version: &VersionId) -> String {
        let windows = HostPlatform::new("windows", self.config.platform.arch());
        download_url(&self.config.dist_url, version, &windows)
    }

    /// `{dist_url}/{v}/win-{arch}/{file}`
    pub fn windows_binary_url(&self, version: &VersionId, file_name: &str) -> String {
        format!(
            "{}/{version}/win-{}/{file_name}",
            self.config.dist_url,
            self.config.platform.arch_token()
        )
    }

    /// Probes the zip and every loose binary, one request after another.
    pub fn probe_windows_files(&self, version: &VersionId) -> ProbeResults {
        let zip = self.downloader.exists(&self.windows_zip_url(version));
        let binaries = WINDOWS_BINARIES
            .iter()
            .filter(|binary| {
                self.downloader
                    .exists(&self.windows_binary_url(version, binary.file_name))
            })
            .map(|binary| binary.file_name)
            .collect();

        let results = ProbeResults { zip, binaries };
        log_debug!("[Resolver] Probe results for {}: {:?}", version, results);
        results
    }

    /// Probes the mirror and picks how `version` can be installed on Windows.
    pub fn detect_strategy(&self, version: &VersionId) -> DownloadStrategy {
        let strategy = self.probe_windows_files(version).strategy();
        log_debug!("[Resolver] Strategy for {}: {:?}", version, strategy);
        strategy
    }
}
