//! Installation of a single Node.js version into `versions/<version>`.
//!
//! ## Flow
//!
//! 1. Normalize the requested version. An existing version directory short-circuits
//!    the whole operation without touching the network.
//! 2. On Windows, probe the mirror for the zip and the loose binaries. Nothing is
//!    created on disk when neither is published.
//! 3. Create the version directory and populate it with one of three strategies:
//!    - Unix: the `.tar.gz` is streamed straight into the extractor.
//!    - Windows zip: downloaded to a temporary file inside the version directory,
//!      extracted, then removed.
//!    - Windows loose binaries: each file downloaded individually, followed by
//!      `.bat` launchers for npm/npx scripts that came without a `.cmd`.
//! 4. If anything fails after the directory exists, it is deleted before the
//!    error is returned, so a present directory always means a finished install.
//!
//! Directory existence is the only "installed" check. A directory left behind by
//! a killed process is therefore treated as a complete install.

use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::assets::{Downloader, download_to_file};
use crate::libs::utilities::compression::{extract_tar_gz, extract_zip};
use crate::libs::utilities::file_operations::copy_stream;
use crate::libs::version_resolver::{DownloadStrategy, VersionResolver, WINDOWS_BINARIES};
use crate::schemas::config::Config;
use crate::schemas::version::VersionId;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::io::BufReader;
use std::path::Path;

/// Scripts that get a `.bat` launcher when their `.cmd` counterpart is missing.
const LAUNCHER_SCRIPTS: [&str; 2] = ["npm", "npx"];

/// Successful result of [`InstallManager::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(VersionId),
    /// The version directory already existed; nothing was downloaded.
    AlreadyInstalled(VersionId),
}

impl InstallOutcome {
    pub fn version(&self) -> &VersionId {
        match self {
            InstallOutcome::Installed(version) | InstallOutcome::AlreadyInstalled(version) => {
                version
            }
        }
    }
}

pub struct InstallManager<'a> {
    config: &'a Config,
    downloader: &'a dyn Downloader,
}

impl<'a> InstallManager<'a> {
    pub fn new(config: &'a Config, downloader: &'a dyn Downloader) -> Self {
        InstallManager { config, downloader }
    }

    /// Installs `input` (with or without the `v` prefix).
    pub fn install(&self, input: &str) -> Result<InstallOutcome> {
        let resolver = VersionResolver::new(self.config, self.downloader);
        let version = resolver.normalize(input)?;
        let version_dir = self.config.version_dir(&version);

        if version_dir.exists() {
            log_info!(
                "[Install] Node.js {} is already installed",
                version.to_string().green()
            );
            return Ok(InstallOutcome::AlreadyInstalled(version));
        }

        let strategy = if self.config.platform.is_windows() {
            match resolver.detect_strategy(&version) {
                DownloadStrategy::Unsupported => {
                    return Err(NodeswapError::UnsupportedPlatform {
                        version,
                        platform: self.config.platform.to_string(),
                    });
                }
                strategy => Some(strategy),
            }
        } else {
            None
        };

        log_info!(
            "[Install] Installing Node.js {} for {}",
            version.to_string().cyan(),
            self.config.platform
        );
        fs::create_dir_all(&version_dir).map_err(|e| {
            NodeswapError::filesystem("Failed to create version directory", &version_dir, e)
        })?;

        let populated = match strategy {
            None => self.install_tarball(&resolver, &version, &version_dir),
            Some(DownloadStrategy::SingleArchive) => {
                self.install_zip(&resolver, &version, &version_dir)
            }
            Some(DownloadStrategy::IndividualBinaries { available }) => {
                self.install_binaries(&resolver, &version, &version_dir, &available)
            }
            Some(DownloadStrategy::Unsupported) => Err(NodeswapError::UnsupportedPlatform {
                version: version.clone(),
                platform: self.config.platform.to_string(),
            }),
        };

        if let Err(err) = populated {
            discard_partial_install(&version_dir);
            return Err(err);
        }

        log_info!(
            "[Install] Node.js {} installed to {}",
            version.to_string().green(),
            version_dir.display()
        );
        Ok(InstallOutcome::Installed(version))
    }

    fn install_tarball(
        &self,
        resolver: &VersionResolver,
        version: &VersionId,
        version_dir: &Path,
    ) -> Result<()> {
        let url = resolver.download_url(version);
        log_info!("[Install] Downloading {}", url.blue());
        let body = self.downloader.open(&url)?;
        extract_tar_gz(body, version_dir)?;
        Ok(())
    }

    fn install_zip(
        &self,
        resolver: &VersionResolver,
        version: &VersionId,
        version_dir: &Path,
    ) -> Result<()> {
        let url = resolver.windows_zip_url(version);
        log_info!("[Install] Downloading {}", url.blue());

        let mut archive = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".zip")
            .tempfile_in(version_dir)
            .map_err(|e| {
                NodeswapError::filesystem("Failed to create temporary archive", version_dir, e)
            })?;
        let archive_path = archive.path().to_path_buf();

        let mut body = self.downloader.open(&url)?;
        let size = copy_stream(
            &mut body,
            archive.as_file_mut(),
            |e| NodeswapError::network(&url, format!("download interrupted: {e}")),
            |e| NodeswapError::filesystem("Failed to write temporary archive", &archive_path, e),
        )?;
        log_debug!("[Install] Downloaded {} bytes to {}", size, archive_path.display());

        let reader = archive.reopen().map_err(|e| {
            NodeswapError::filesystem("Failed to reopen temporary archive", &archive_path, e)
        })?;
        extract_zip(BufReader::new(reader), version_dir)?;

        if let Err(err) = archive.close() {
            log_warn!(
                "[Install] Could not remove temporary archive {}: {}",
                archive_path.display(),
                err
            );
        }
        Ok(())
    }

    fn install_binaries(
        &self,
        resolver: &VersionResolver,
        version: &VersionId,
        version_dir: &Path,
        available: &[&str],
    ) -> Result<()> {
        let mut fetched: Vec<&str> = Vec::new();

        for binary in WINDOWS_BINARIES.iter() {
            let url = resolver.windows_binary_url(version, binary.file_name);

            if !available.contains(&binary.file_name) {
                if binary.required {
                    return Err(NodeswapError::network(url, "required file is not published"));
                }
                log_info!("[Install] {} is not published, skipping", binary.file_name);
                continue;
            }

            let target = version_dir.join(binary.file_name);
            match download_to_file(self.downloader, &url, &target) {
                Ok(_) => fetched.push(binary.file_name),
                Err(err) if binary.required => return Err(err),
                Err(err) => {
                    log_warn!(
                        "[Install] Failed to download optional {}: {}",
                        binary.file_name,
                        err
                    );
                    if target.exists() {
                        if let Err(e) = fs::remove_file(&target) {
                            log_warn!(
                                "[Install] Could not remove partial {}: {}",
                                target.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        write_launchers(version_dir, &fetched)?;

        if !fetched.contains(&"npm") && !fetched.contains(&"npm.cmd") {
            log_warn!(
                "[Install] npm is not available for {}. npm must be installed manually (npm install -g npm)",
                version
            );
        }
        Ok(())
    }
}

/// Batch file that runs a bare npm/npx script with the bundled `node.exe`.
pub fn launcher_script(script: &str) -> String {
    format!(
        "@echo off\r\n\
         setlocal\r\n\
         set \"NODE_EXE=%~dp0node.exe\"\r\n\
         set \"SCRIPT_JS=%~dp0{script}\"\r\n\
         if exist \"%SCRIPT_JS%\" (\r\n\
         \x20 \"%NODE_EXE%\" \"%SCRIPT_JS%\" %*\r\n\
         ) else (\r\n\
         \x20 echo {script} not found in this Node.js installation\r\n\
         \x20 exit /b 1\r\n\
         )\r\n"
    )
}

fn write_launchers(version_dir: &Path, fetched: &[&str]) -> Result<()> {
    for script in LAUNCHER_SCRIPTS {
        let has_cmd = fetched.contains(&format!("{script}.cmd").as_str());
        if !fetched.contains(&script) || has_cmd {
            continue;
        }

        let launcher = version_dir.join(format!("{script}.bat"));
        fs::write(&launcher, launcher_script(script))
            .map_err(|e| NodeswapError::filesystem("Failed to write launcher", &launcher, e))?;
        log_debug!("[Install] Created launcher {}", launcher.display());
    }
    Ok(())
}

/// Compensating step for a failed install: nothing may remain in `versions/`.
fn discard_partial_install(version_dir: &Path) {
    log_debug!("[Install] Removing partial install at {}", version_dir.display());
    if let Err(err) = fs::remove_dir_all(version_dir) {
        log_warn!(
            "[Install] Could not remove partial install {}: {}",
            version_dir.display().to_string().red(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::{FakeDownloader, build_zip, node_tarball, sandbox_config};
    use tempfile::TempDir;

    const LINUX_TARBALL: &str = "https://mirror.test/dist/v18.0.0/node-v18.0.0-linux-x64.tar.gz";
    const WIN_ZIP: &str = "https://mirror.test/dist/v18.0.0/node-v18.0.0-win-x64.zip";

    fn win_binary(name: &str) -> String {
        format!("https://mirror.test/dist/v4.0.0/win-x64/{name}")
    }

    #[test]
    fn test_install_unix_tarball() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "linux");
        let downloader =
            FakeDownloader::new().serve(LINUX_TARBALL, node_tarball("v18.0.0", "linux-x64"));

        let outcome = InstallManager::new(&config, &downloader).install("18.0.0").unwrap();

        let dir = config.version_dir(&VersionId::normalize("18.0.0"));
        assert_eq!(outcome, InstallOutcome::Installed(VersionId::normalize("v18.0.0")));
        assert!(dir.join("bin").join("node").is_file());
        assert!(dir.join("include").join("node").join("node.h").is_file());
        assert!(!dir.join("node-v18.0.0-linux-x64").exists());
    }

    #[test]
    fn test_install_twice_downloads_once() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "linux");
        let downloader =
            FakeDownloader::new().serve(LINUX_TARBALL, node_tarball("v18.0.0", "linux-x64"));
        let manager = InstallManager::new(&config, &downloader);

        manager.install("v18.0.0").unwrap();
        let requests_after_first = downloader.requests().len();
        let second = manager.install("18.0.0").unwrap();

        assert!(matches!(second, InstallOutcome::AlreadyInstalled(_)));
        assert_eq!(downloader.requests().len(), requests_after_first);
    }

    #[test]
    fn test_failed_download_leaves_no_directory() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "linux");
        let downloader = FakeDownloader::new();

        let err = InstallManager::new(&config, &downloader).install("99.0.0").unwrap_err();

        assert!(matches!(err, NodeswapError::Network { .. }));
        assert!(!config.version_dir(&VersionId::normalize("99.0.0")).exists());
    }

    #[test]
    fn test_corrupt_archive_leaves_no_directory() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "linux");
        let downloader = FakeDownloader::new().serve(LINUX_TARBALL, b"not a tarball".to_vec());

        let err = InstallManager::new(&config, &downloader).install("18.0.0").unwrap_err();

        assert!(matches!(err, NodeswapError::ArchiveFormat { .. }));
        assert!(!config.version_dir(&VersionId::normalize("18.0.0")).exists());
    }

    #[test]
    fn test_install_rejects_paths_outside_versions() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "linux");
        let downloader = FakeDownloader::new();
        let manager = InstallManager::new(&config, &downloader);

        for input in ["18.0.0/../../../victim", "..\\..\\victim", "v"] {
            let err = manager.install(input).unwrap_err();
            assert!(matches!(err, NodeswapError::InvalidVersion { .. }), "{input:?}");
        }

        assert!(downloader.requests().is_empty());
        assert!(!temp.path().join("victim").exists());
        assert!(!config.versions_dir().exists());
    }

    #[test]
    fn test_install_windows_corrupt_zip_cleans_up() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let downloader = FakeDownloader::new().serve(WIN_ZIP, b"PK but not really a zip".to_vec());

        let err = InstallManager::new(&config, &downloader).install("18.0.0").unwrap_err();

        assert!(matches!(err, NodeswapError::ArchiveFormat { .. }));
        assert!(!config.version_dir(&VersionId::normalize("18.0.0")).exists());
        let leftovers: Vec<_> = fs::read_dir(config.versions_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .collect();
        assert!(leftovers.is_empty(), "left behind: {leftovers:?}");
        assert_eq!(downloader.downloads(), vec![WIN_ZIP.to_string()]);
    }

    #[test]
    fn test_install_windows_zip_removes_temporary_archive() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let zip = build_zip(&[
            ("node-v18.0.0-win-x64/", None),
            ("node-v18.0.0-win-x64/node.exe", Some(b"MZ".as_slice())),
            ("node-v18.0.0-win-x64/npm.cmd", Some(b"@echo off".as_slice())),
        ]);
        let downloader = FakeDownloader::new().serve(WIN_ZIP, zip);

        InstallManager::new(&config, &downloader).install("18.0.0").unwrap();

        let dir = config.version_dir(&VersionId::normalize("18.0.0"));
        assert_eq!(fs::read(dir.join("node.exe")).unwrap(), b"MZ");
        assert!(dir.join("npm.cmd").is_file());
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".zip"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_install_windows_binaries_writes_launchers() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let downloader = FakeDownloader::new()
            .serve(&win_binary("node.exe"), b"MZ".to_vec())
            .serve(&win_binary("npm"), b"#!/usr/bin/env node".to_vec())
            .serve(&win_binary("npx"), b"#!/usr/bin/env node".to_vec())
            .serve(&win_binary("npx.cmd"), b"@echo off".to_vec());

        InstallManager::new(&config, &downloader).install("4.0.0").unwrap();

        let dir = config.version_dir(&VersionId::normalize("4.0.0"));
        assert!(dir.join("node.exe").is_file());
        assert!(dir.join("npm").is_file());
        assert!(dir.join("npm.bat").is_file());
        assert!(!dir.join("npx.bat").exists());
        let launcher = fs::read_to_string(dir.join("npm.bat")).unwrap();
        assert!(launcher.contains("%~dp0node.exe"));
        assert!(launcher.contains("%~dp0npm"));
    }

    #[test]
    fn test_install_windows_optional_failure_is_skipped() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let downloader = FakeDownloader::new()
            .serve(&win_binary("node.exe"), b"MZ".to_vec())
            .advertise(&win_binary("npm"));

        InstallManager::new(&config, &downloader).install("4.0.0").unwrap();

        let dir = config.version_dir(&VersionId::normalize("4.0.0"));
        assert!(dir.join("node.exe").is_file());
        assert!(!dir.join("npm").exists());
        assert!(!dir.join("npm.bat").exists());
    }

    #[test]
    fn test_install_windows_required_failure_cleans_up() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let downloader = FakeDownloader::new()
            .advertise(&win_binary("node.exe"))
            .serve(&win_binary("npm"), b"#!/usr/bin/env node".to_vec());

        let err = InstallManager::new(&config, &downloader).install("4.0.0").unwrap_err();

        assert!(matches!(err, NodeswapError::Network { .. }));
        assert!(!config.version_dir(&VersionId::normalize("4.0.0")).exists());
    }

    #[test]
    fn test_install_windows_unsupported_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(temp.path(), "windows");
        let downloader = FakeDownloader::new();

        let err = InstallManager::new(&config, &downloader).install("0.1.14").unwrap_err();

        assert!(matches!(err, NodeswapError::UnsupportedPlatform { .. }));
        assert!(!config.version_dir(&VersionId::normalize("0.1.14")).exists());
        assert!(downloader.downloads().is_empty());
    }

    #[test]
    fn test_launcher_script_forwards_arguments() {
        let script = launcher_script("npx");
        assert!(script.starts_with("@echo off"));
        assert!(script.contains("\"%NODE_EXE%\" \"%SCRIPT_JS%\" %*"));
        assert!(script.contains("npx not found"));
    }
}
