use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copies `reader` into `writer`, keeping read and write failures apart.
///
/// `io::copy` folds both sides into one `io::Error`; the callers need to tell a
/// broken download or corrupt archive (read side) from a full disk (write side).
pub fn copy_stream<R, W, E>(
    reader: &mut R,
    writer: &mut W,
    on_read: impl Fn(io::Error) -> E,
    on_write: impl Fn(io::Error) -> E,
) -> Result<u64, E>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(on_read(e)),
        };
        writer.write_all(&buffer[..read]).map_err(&on_write)?;
        total += read as u64;
    }
    writer.flush().map_err(&on_write)?;
    Ok(total)
}

/// Determines the shell RC file for the given `$SHELL` value.
///
/// # Supported Shells
/// - anything whose basename contains "zsh" -> ~/.zshrc
/// - everything else, including an unset `$SHELL` -> ~/.bashrc
pub fn rc_file_for_shell(home: &Path, shell: Option<&str>) -> PathBuf {
    let shell_name = shell
        .and_then(|s| Path::new(s).file_name())
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let rc_file_name = if shell_name.contains("zsh") { ".zshrc" } else { ".bashrc" };
    home.join(rc_file_name)
}

/// Reads RC file lines, or an empty list when the file doesn't exist or can't be read.
pub fn read_rc_file(rc_path: &Path) -> Vec<String> {
    if !rc_path.exists() {
        return vec![];
    }

    match fs::File::open(rc_path) {
        Ok(file) => BufReader::new(file).lines().map_while(Result::ok).collect(),
        Err(err) => {
            log_warn!(
                "[Shell Config] Could not read RC file {}: {}. Treating it as empty.",
                rc_path.display().to_string().red(),
                err.to_string().red()
            );
            vec![]
        }
    }
}

/// Appends `line` to the RC file unless an identical (trimmed) line is already there.
///
/// # Returns
/// * `Ok(true)` if the line was appended, `Ok(false)` if it was already present.
pub fn append_line_if_missing(rc_path: &Path, line: &str) -> io::Result<bool> {
    if read_rc_file(rc_path).iter().any(|existing| existing.trim() == line) {
        log_debug!("[Shell Config] {} already contains the PATH entry", rc_path.display());
        return Ok(false);
    }

    if let Some(parent) = rc_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(rc_path)?;
    writeln!(file)?;
    writeln!(file, "{line}")?;
    Ok(true)
}

/// Recursively copies the contents of `src` into `dst`, creating `dst`.
/// Symlinks inside `src` are followed and copied as regular files/directories.
pub fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<u64> {
    fs::create_dir_all(dst)?;
    let mut copied = 0u64;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    log_debug!(
        "[Files] Copied {} files from {} to {}",
        copied,
        src.display(),
        dst.display()
    );
    Ok(copied)
}
