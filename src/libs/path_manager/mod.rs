//! OS-specific handling of the active pointer and of PATH visibility.
//!
//! Each OS family gets one [`PathManager`] implementation:
//! - [`unix::UnixPathManager`]: symlink pointer, `export PATH=...` line in the
//!   shell rc file.
//! - [`windows::WindowsPathManager`]: junction pointer (with a PowerShell and a
//!   plain-copy fallback), user PATH in `HKCU\Environment`.
//!
//! External programs (`reg`, `cmd`, `powershell`) are spawned through
//! [`CommandRunner`] so the Windows flow can be exercised on any host.

pub mod unix;
pub mod windows;

use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::platform::HostPlatform;
use crate::log_debug;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Spawns external programs and waits for them.
pub trait CommandRunner {
    /// `Err` only when the program could not be started at all.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs commands on the real system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        log_debug!("[Command] {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// How the active pointer ended up being constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Symlink,
    Junction,
    /// Literal copy of the version directory. Goes stale if that directory changes.
    Copy,
}

/// Result of persisting a directory on PATH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathUpdate {
    AlreadyPresent,
    Appended {
        /// Where the entry was written: rc file path or registry key.
        location: String,
        /// Whether running shells were notified. Always `true` on Unix.
        broadcast_ok: bool,
    },
}

/// Process environment that influences PATH handling, captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct ShellEnv {
    pub home: Option<PathBuf>,
    /// Value of `$SHELL`.
    pub shell: Option<String>,
    /// PATH of the running process.
    pub session_path: Option<OsString>,
}

impl ShellEnv {
    pub fn from_process() -> Self {
        ShellEnv {
            home: dirs::home_dir(),
            shell: env::var("SHELL").ok(),
            session_path: env::var_os("PATH"),
        }
    }

    /// Whether `dir` is one of the entries of the session PATH.
    pub fn session_path_contains(&self, dir: &Path) -> bool {
        self.session_path
            .as_deref()
            .is_some_and(|path| path_list_contains(path, dir))
    }
}

/// Splits a PATH-style list and compares entries component-wise, so trailing
/// separators do not matter.
pub fn path_list_contains(path_list: &OsStr, dir: &Path) -> bool {
    env::split_paths(path_list).any(|entry| entry == dir)
}

/// Owns pointer construction and persisted PATH updates for one OS family.
pub trait PathManager {
    /// Makes sure `dir` is on the persisted PATH, appending it if missing.
    fn ensure_on_path(&self, dir: &Path) -> Result<PathUpdate>;

    /// Whether `dir` is already on the persisted PATH.
    fn is_on_path(&self, dir: &Path) -> bool;

    /// Creates `pointer` so that it resolves to `target`. `pointer` must not exist.
    fn link_pointer(&self, target: &Path, pointer: &Path) -> Result<LinkKind>;

    /// Removes whatever is at `pointer`: file, symlink, junction or directory.
    fn remove_pointer(&self, pointer: &Path) -> Result<()> {
        remove_entry(pointer)
            .map_err(|e| NodeswapError::filesystem("Failed to remove active pointer", pointer, e))
    }

    /// Shell snippet that puts `dir` on PATH for the current session.
    fn env_snippet(&self, dir: &Path) -> String;

    /// What the user should do when the running shell does not see `dir` yet.
    fn refresh_hint(&self) -> String;
}

/// Picks the implementation for the configured platform.
pub fn for_platform(platform: &HostPlatform, shell_env: &ShellEnv) -> Box<dyn PathManager> {
    if platform.is_windows() {
        Box::new(windows::WindowsPathManager::new(SystemRunner))
    } else {
        Box::new(unix::UnixPathManager::new(
            shell_env.home.clone(),
            shell_env.shell.clone(),
        ))
    }
}

/// Removes `path` without following it. A missing path is not an error.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        // Directory symlinks and junctions on Windows only go away with remove_dir.
        fs::remove_file(path).or_else(|_| fs::remove_dir(path))
    } else if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Whether anything (including a dangling link) exists at `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_entry_handles_every_kind() {
        let temp = TempDir::new().unwrap();

        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        remove_entry(&file).unwrap();
        assert!(!entry_exists(&file));

        let dir = temp.path().join("dir");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("f"), "x").unwrap();
        remove_entry(&dir).unwrap();
        assert!(!entry_exists(&dir));

        remove_entry(&temp.path().join("missing")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_entry_keeps_symlink_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_entry(&link).unwrap();

        assert!(!entry_exists(&link));
        assert!(target.join("keep").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_path_contains() {
        let shell_env = ShellEnv {
            session_path: Some(OsString::from("/usr/bin:/home/dev/.nodeswap/current/bin/:/bin")),
            ..ShellEnv::default()
        };
        assert!(shell_env.session_path_contains(Path::new("/home/dev/.nodeswap/current/bin")));
        assert!(!shell_env.session_path_contains(Path::new("/home/dev/.nodeswap/current")));
        assert!(!ShellEnv::default().session_path_contains(Path::new("/usr/bin")));
    }
}
