//! Switching, inspecting and removing installed versions.
//!
//! The active version is whatever `<app_dir>/current` resolves to. On a fresh
//! setup it points at the empty placeholder directory, which reads as "no
//! active version". `use` replaces the pointer; nothing else mutates it.

use crate::errors::{NodeswapError, Result};
use crate::libs::path_manager::{LinkKind, PathManager, PathUpdate, ShellEnv, entry_exists};
use crate::schemas::config::Config;
use crate::schemas::version::VersionId;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One entry of the local listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    pub version: VersionId,
    pub active: bool,
}

/// Snapshot printed by `nodeswap status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub executable_dir: PathBuf,
    /// Persisted in the rc file or the user registry PATH.
    pub persisted_on_path: bool,
    /// Visible to the shell nodeswap was started from.
    pub session_on_path: bool,
    pub active_version: Option<VersionId>,
    /// `node --version` run through the pointer.
    pub node_version: Option<String>,
    /// `npm --version` run through the pointer.
    pub npm_version: Option<String>,
}

pub struct ActivationManager<'a> {
    config: &'a Config,
    path_manager: &'a dyn PathManager,
    shell_env: &'a ShellEnv,
}

impl<'a> ActivationManager<'a> {
    pub fn new(config: &'a Config, path_manager: &'a dyn PathManager, shell_env: &'a ShellEnv) -> Self {
        ActivationManager {
            config,
            path_manager,
            shell_env,
        }
    }

    /// Creates the directory layout and, on first run only, points `current`
    /// at the empty placeholder. Safe to call before every command.
    pub fn init(&self) -> Result<()> {
        for dir in [
            self.config.app_dir.clone(),
            self.config.versions_dir(),
            self.config.placeholder_dir(),
        ] {
            fs::create_dir_all(&dir)
                .map_err(|e| NodeswapError::filesystem("Failed to create directory", &dir, e))?;
        }

        let pointer = self.config.pointer_path();
        if !entry_exists(&pointer) {
            let kind = self
                .path_manager
                .link_pointer(&self.config.placeholder_dir(), &pointer)?;
            log_debug!("[Init] Created {} as {:?}", pointer.display(), kind);
        }
        Ok(())
    }

    /// Makes `input` the active version.
    ///
    /// The PATH bootstrap is best effort: a failure there is reported and the
    /// switch still happens. With `print_env`, a snippet for the current shell
    /// is written to stdout.
    pub fn use_version(&self, input: &str, print_env: bool) -> Result<VersionId> {
        let version = VersionId::parse(input)?;
        let version_dir = self.config.version_dir(&version);
        if !version_dir.is_dir() {
            return Err(NodeswapError::NotInstalled {
                version,
                requested: input.trim().to_string(),
            });
        }

        let executable_dir = self.config.executable_dir();
        match self.path_manager.ensure_on_path(&executable_dir) {
            Ok(PathUpdate::Appended { broadcast_ok: false, location }) => log_warn!(
                "[PATH] Updated {} but running shells were not notified. Restart your terminal.",
                location
            ),
            Ok(_) => {}
            Err(err) => log_warn!(
                "[PATH] {}. Add {} to your PATH manually.",
                err,
                executable_dir.display().to_string().yellow()
            ),
        }

        if self.switch_pointer(&version_dir)? == LinkKind::Copy {
            log_warn!(
                "[Activate] {} is a copy of {}, not a link. Run 'nodeswap use {}' again after changing that version.",
                self.config.pointer_path().display(),
                version_dir.display(),
                version
            );
        }
        log_info!("[Activate] Now using Node.js {}", version.to_string().green());

        if print_env {
            println!("{}", self.path_manager.env_snippet(&executable_dir));
        } else if !self.shell_env.session_path_contains(&executable_dir) {
            log_info!("[Activate] {}", self.path_manager.refresh_hint());
        }
        Ok(version)
    }

    /// Replaces the pointer. The old entry is gone before the new one is built.
    fn switch_pointer(&self, target: &Path) -> Result<LinkKind> {
        let pointer = self.config.pointer_path();
        self.path_manager.remove_pointer(&pointer)?;
        self.path_manager.link_pointer(target, &pointer)
    }

    /// Output of the active `node --version`, trimmed.
    pub fn show_current(&self) -> Result<String> {
        query_version(&self.config.node_executable()).ok_or(NodeswapError::NoActiveVersion)
    }

    /// Path of the active `node` executable.
    pub fn show_which(&self) -> Result<PathBuf> {
        self.active_version().ok_or(NodeswapError::NoActiveVersion)?;
        Ok(self.config.node_executable())
    }

    /// Which installed version the pointer resolves to, if any.
    ///
    /// Reads the link target first. Copies (and links whose target cannot be
    /// mapped back into `versions/`) fall back to asking the executable.
    pub fn active_version(&self) -> Option<VersionId> {
        let pointer = self.config.pointer_path();

        if let Ok(target) = fs::read_link(&pointer) {
            let target = match pointer.parent() {
                Some(parent) if target.is_relative() => parent.join(target),
                _ => target,
            };
            if target == self.config.placeholder_dir() {
                return None;
            }
            if target.parent() == Some(self.config.versions_dir().as_path()) {
                if let Some(name) = target.file_name() {
                    return Some(VersionId::normalize(&name.to_string_lossy()));
                }
            }
        }

        query_version(&self.config.node_executable()).map(|output| VersionId::normalize(&output))
    }

    /// Deletes an installed version. The active one is refused.
    pub fn uninstall(&self, input: &str) -> Result<VersionId> {
        let version = VersionId::parse(input)?;
        let version_dir = self.config.version_dir(&version);
        if !version_dir.is_dir() {
            return Err(NodeswapError::NotInstalled {
                version,
                requested: input.trim().to_string(),
            });
        }

        if self.active_version().as_ref() == Some(&version) {
            return Err(NodeswapError::CannotRemoveActiveVersion { version });
        }

        fs::remove_dir_all(&version_dir)
            .map_err(|e| NodeswapError::filesystem("Failed to remove version", &version_dir, e))?;
        log_info!("[Uninstall] Removed Node.js {}", version.to_string().green());
        Ok(version)
    }

    /// Installed versions in lexicographic order, the active one flagged.
    pub fn list_local(&self) -> Result<Vec<LocalVersion>> {
        let versions_dir = self.config.versions_dir();
        let entries = match fs::read_dir(&versions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(NodeswapError::filesystem(
                    "Failed to list installed versions",
                    &versions_dir,
                    e,
                ));
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        let active = self.active_version();
        Ok(names
            .into_iter()
            .map(|name| {
                let version = VersionId::from(name);
                LocalVersion {
                    active: active.as_ref() == Some(&version),
                    version,
                }
            })
            .collect())
    }

    pub fn status(&self) -> StatusReport {
        let executable_dir = self.config.executable_dir();
        StatusReport {
            persisted_on_path: self.path_manager.is_on_path(&executable_dir),
            session_on_path: self.shell_env.session_path_contains(&executable_dir),
            active_version: self.active_version(),
            node_version: query_version(&self.config.node_executable()),
            npm_version: query_version(&self.config.npm_executable()),
            executable_dir,
        }
    }
}

/// Runs `<executable> --version`. `None` if it is missing, fails or prints nothing.
fn query_version(executable: &Path) -> Option<String> {
    if !executable.is_file() {
        return None;
    }
    let output = Command::new(executable).arg("--version").output().ok()?;
    if !output.status.success() {
        log_debug!("[Activate] {} --version exited with {}", executable.display(), output.status);
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
