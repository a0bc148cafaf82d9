// Unix flavour: the pointer is a symlink and PATH lives in the shell rc file.

use super::{LinkKind, PathManager, PathUpdate};
use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::file_operations::{
    append_line_if_missing, rc_file_for_shell, read_rc_file,
};
use crate::{log_debug, log_info};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub struct UnixPathManager {
    home: Option<PathBuf>,
    shell: Option<String>,
}

impl UnixPathManager {
    pub fn new(home: Option<PathBuf>, shell: Option<String>) -> Self {
        UnixPathManager { home, shell }
    }

    /// `~/.zshrc` for zsh users, `~/.bashrc` for everyone else.
    pub fn rc_file(&self) -> Result<PathBuf> {
        let home = self
            .home
            .as_deref()
            .ok_or_else(|| NodeswapError::environment("cannot determine the home directory"))?;
        Ok(rc_file_for_shell(home, self.shell.as_deref()))
    }

    pub fn export_line(dir: &Path) -> String {
        format!("export PATH=\"{}:$PATH\"", dir.display())
    }
}

impl PathManager for UnixPathManager {
    fn ensure_on_path(&self, dir: &Path) -> Result<PathUpdate> {
        let rc_file = self.rc_file()?;
        let line = Self::export_line(dir);

        let appended = append_line_if_missing(&rc_file, &line).map_err(|e| {
            NodeswapError::environment(format!("cannot update {}: {e}", rc_file.display()))
        })?;

        if !appended {
            return Ok(PathUpdate::AlreadyPresent);
        }

        log_info!(
            "[PATH] Added {} to {}",
            dir.display().to_string().cyan(),
            rc_file.display().to_string().cyan()
        );
        Ok(PathUpdate::Appended {
            location: rc_file.display().to_string(),
            broadcast_ok: true,
        })
    }

    fn is_on_path(&self, dir: &Path) -> bool {
        let Ok(rc_file) = self.rc_file() else {
            return false;
        };
        let line = Self::export_line(dir);
        read_rc_file(&rc_file)
            .iter()
            .any(|existing| existing.trim() == line)
    }

    fn link_pointer(&self, target: &Path, pointer: &Path) -> Result<LinkKind> {
        create_link(target, pointer)
    }

    fn env_snippet(&self, dir: &Path) -> String {
        Self::export_line(dir)
    }

    fn refresh_hint(&self) -> String {
        let rc_file = self
            .rc_file()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|_| "your shell rc file".to_string());
        format!(
            "Run 'source {rc_file}' or 'eval \"$(nodeswap use <version> --print-env)\"' to update this shell"
        )
    }
}

#[cfg(unix)]
fn create_link(target: &Path, pointer: &Path) -> Result<LinkKind> {
    std::os::unix::fs::symlink(target, pointer)
        .map_err(|e| NodeswapError::filesystem("Failed to create symlink", pointer, e))?;
    log_debug!("[Pointer] {} -> {}", pointer.display(), target.display());
    Ok(LinkKind::Symlink)
}

#[cfg(not(unix))]
fn create_link(target: &Path, pointer: &Path) -> Result<LinkKind> {
    crate::libs::utilities::file_operations::copy_dir_all(target, pointer)
        .map_err(|e| NodeswapError::filesystem("Failed to copy version directory", pointer, e))?;
    Ok(LinkKind::Copy)
}
