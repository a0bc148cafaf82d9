// Windows flavour: the pointer is a directory junction and PATH lives in the
// user environment (`HKCU\Environment`).
//
// Junctions need no elevation, but `mklink` is a `cmd` builtin and some locked
// down machines block it, hence the PowerShell attempt and the final copy.

use super::{CommandOutput, CommandRunner, LinkKind, PathManager, PathUpdate, entry_exists, remove_entry};
use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::file_operations::copy_dir_all;
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::path::Path;

const ENVIRONMENT_KEY: &str = r"HKCU\Environment";

/// What `reg query` prints when the user has no PATH value yet.
const MISSING_VALUE_MESSAGE: &str = "unable to find the specified registry key or value";

/// Re-publishes the user PATH so new processes pick it up without a logoff.
const BROADCAST_SCRIPT: &str = "[System.Environment]::SetEnvironmentVariable('PATH', [System.Environment]::GetEnvironmentVariable('PATH', 'User'), 'User')";

pub struct WindowsPathManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> WindowsPathManager<R> {
    pub fn new(runner: R) -> Self {
        WindowsPathManager { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<CommandOutput> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        match self.runner.run(program, &args) {
            Ok(output) => Some(output),
            Err(err) => {
                log_debug!("[Command] Could not start {}: {}", program, err);
                None
            }
        }
    }

    /// The user PATH from the registry. `Ok(None)` only when the value does
    /// not exist; any other failure is an error so the value is never rewritten
    /// from a blank read.
    fn read_user_path(&self) -> Result<Option<String>> {
        let output = self
            .run("reg", &["query", ENVIRONMENT_KEY, "/v", "PATH"])
            .ok_or_else(|| NodeswapError::environment("could not run 'reg query'"))?;

        if !output.success {
            if is_missing_value(&output) {
                log_debug!("[PATH] No user PATH value in {}", ENVIRONMENT_KEY);
                return Ok(None);
            }
            return Err(NodeswapError::environment(format!(
                "'reg query' failed: {}",
                command_detail(&output)
            )));
        }

        parse_reg_query_path(&output.stdout).map(Some).ok_or_else(|| {
            NodeswapError::environment("'reg query' printed no PATH value")
        })
    }

    fn broadcast(&self) -> bool {
        self.run("powershell", &["-NoProfile", "-Command", BROADCAST_SCRIPT])
            .is_some_and(|output| output.success)
    }

    /// One junction attempt. Leftovers of a failed attempt are removed.
    fn try_junction(&self, program: &str, args: &[&str], pointer: &Path) -> bool {
        let ran = self.run(program, args).is_some_and(|output| output.success);
        if ran && pointer.exists() {
            return true;
        }
        if entry_exists(pointer) {
            if let Err(e) = remove_entry(pointer) {
                log_warn!(
                    "[Activate] Could not remove failed junction {}: {}",
                    pointer.display(),
                    e
                );
            }
        }
        false
    }
}

impl<R: CommandRunner> PathManager for WindowsPathManager<R> {
    fn ensure_on_path(&self, dir: &Path) -> Result<PathUpdate> {
        let current = self.read_user_path()?.unwrap_or_default();
        let dir = dir.display().to_string();

        if registry_path_contains(&current, &dir) {
            return Ok(PathUpdate::AlreadyPresent);
        }

        let current = current.trim().trim_end_matches(';');
        let updated = if current.is_empty() {
            dir.clone()
        } else {
            format!("{current};{dir}")
        };

        let output = self
            .run(
                "reg",
                &["add", ENVIRONMENT_KEY, "/v", "PATH", "/t", "REG_EXPAND_SZ", "/d", &updated, "/f"],
            )
            .ok_or_else(|| NodeswapError::environment("could not run 'reg add'"))?;
        if !output.success {
            return Err(NodeswapError::environment(format!(
                "'reg add' failed: {}",
                output.stderr.trim()
            )));
        }

        log_info!("[PATH] Added {} to the user PATH", dir.cyan());
        let broadcast_ok = self.broadcast();
        Ok(PathUpdate::Appended {
            location: format!(r"{ENVIRONMENT_KEY}\PATH"),
            broadcast_ok,
        })
    }

    fn is_on_path(&self, dir: &Path) -> bool {
        match self.read_user_path() {
            Ok(Some(path)) => registry_path_contains(&path, &dir.display().to_string()),
            _ => false,
        }
    }

    fn link_pointer(&self, target: &Path, pointer: &Path) -> Result<LinkKind> {
        if let Some(parent) = pointer.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| NodeswapError::filesystem("Failed to create directory", parent, e))?;
        }
        let target_arg = target.display().to_string();
        let pointer_arg = pointer.display().to_string();

        if self.try_junction("cmd", &["/c", "mklink", "/J", &pointer_arg, &target_arg], pointer) {
            log_debug!("[Pointer] mklink /J {} -> {}", pointer_arg, target_arg);
            return Ok(LinkKind::Junction);
        }

        let script = format!(
            "New-Item -ItemType Junction -Path '{pointer_arg}' -Target '{target_arg}' -Force | Out-Null"
        );
        if self.try_junction("powershell", &["-NoProfile", "-Command", &script], pointer) {
            log_debug!("[Pointer] New-Item Junction {} -> {}", pointer_arg, target_arg);
            return Ok(LinkKind::Junction);
        }

        log_warn!(
            "[Pointer] Could not create a junction, copying {} instead",
            target_arg.yellow()
        );
        copy_dir_all(target, pointer)
            .map_err(|e| NodeswapError::filesystem("Failed to copy version directory", pointer, e))?;
        Ok(LinkKind::Copy)
    }

    fn remove_pointer(&self, pointer: &Path) -> Result<()> {
        let removed = remove_entry(pointer);
        if removed.is_ok() && !entry_exists(pointer) {
            return Ok(());
        }

        let pointer_arg = pointer.display().to_string();
        self.run("cmd", &["/c", "rmdir", "/Q", &pointer_arg]);
        if !entry_exists(pointer) {
            return Ok(());
        }

        Err(NodeswapError::filesystem(
            "Failed to remove active pointer",
            pointer,
            removed.err().unwrap_or_else(|| std::io::Error::other("entry still present")),
        ))
    }

    fn env_snippet(&self, dir: &Path) -> String {
        format!("$env:Path = \"{};\" + $env:Path", dir.display())
    }

    fn refresh_hint(&self) -> String {
        "Restart your terminal or run 'refreshenv' to pick up the new PATH".to_string()
    }
}

/// Extracts the PATH value from `reg query HKCU\Environment /v PATH` output:
///
/// ```text
/// HKEY_CURRENT_USER\Environment
///     PATH    REG_EXPAND_SZ    C:\Users\dev\bin;C:\Program Files\tool
/// ```
pub fn parse_reg_query_path(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace)?;
        if !name.eq_ignore_ascii_case("PATH") {
            return None;
        }
        let rest = rest.trim_start();
        let (kind, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        kind.starts_with("REG_").then(|| value.trim().to_string())
    })
}

fn is_missing_value(output: &CommandOutput) -> bool {
    [&output.stderr, &output.stdout]
        .iter()
        .any(|text| text.to_ascii_lowercase().contains(MISSING_VALUE_MESSAGE))
}

fn command_detail(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        output.stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}

/// `;`-separated membership test, case-insensitive, ignoring trailing separators.
pub fn registry_path_contains(path: &str, dir: &str) -> bool {
    let wanted = normalize_entry(dir);
    !wanted.is_empty() && path.split(';').any(|entry| normalize_entry(entry) == wanted)
}

fn normalize_entry(entry: &str) -> String {
    entry
        .trim()
        .trim_end_matches(['\\', '/'])
        .to_ascii_lowercase()
}
