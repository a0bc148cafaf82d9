//! Archive extraction for Node.js distributions.
//!
//! Every distribution archive wraps its payload in a single top-level directory
//! named `node-<version>-<platform>-<arch>`. Only what lives below that wrapper
//! matters, so each entry has its first path segment stripped before it is
//! written under the destination directory.
//!
//! Failures split into two kinds:
//! - stream-level corruption (bad gzip header, truncated tar header, broken zip
//!   directory, unreadable entry body) is an `ArchiveFormat` error;
//! - problems writing to disk are `Filesystem` errors.
//!
//! Either way nothing extracted so far is valid; the caller removes the
//! destination directory.

use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::file_operations::copy_stream;
use crate::{log_debug, log_warn};
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use zip::ZipArchive;

/// What a single extraction run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub files: usize,
    pub directories: usize,
    /// Entries that were not written: links, devices, unsafe paths.
    pub skipped: Vec<String>,
}

/// Maps an archive entry name to its destination-relative path.
///
/// # Returns
/// * `None` for the wrapper directory itself (`node-v1-linux-x64` or
///   `node-v1-linux-x64/`), which carries no payload.
/// * `Some(path)` with the first segment removed otherwise.
pub fn strip_wrapper_segment(entry_name: &str) -> Option<PathBuf> {
    let mut segments = entry_name.split('/');
    segments.next()?;
    let remainder: Vec<&str> = segments.collect();
    if remainder.is_empty() {
        return None;
    }
    let relative = remainder.join("/");
    if relative.is_empty() {
        return None;
    }
    Some(PathBuf::from(relative))
}

/// Rejects paths that would land outside the destination directory.
fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Unpacks a gzip-compressed tar stream into `dest`, stripping the wrapper segment.
///
/// The stream is consumed as it arrives; no temporary file is involved.
/// Symbolic links, hard links and special files are skipped with a warning.
pub fn extract_tar_gz<R: Read>(reader: R, dest: &Path) -> Result<ExtractionSummary> {
    log_debug!("[Extract] Unpacking tar.gz stream into {}", dest.display());
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut summary = ExtractionSummary::default();

    let entries = archive
        .entries()
        .map_err(|e| NodeswapError::archive_with_source("cannot read tar stream", e))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| NodeswapError::archive_with_source("corrupt tar entry header", e))?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

        let Some(relative) = strip_wrapper_segment(&name) else {
            continue;
        };
        if !is_contained(&relative) {
            log_warn!("[Extract] Skipping entry with unsafe path: {}", name.red());
            summary.skipped.push(name);
            continue;
        }
        let target = dest.join(&relative);
        let entry_type = entry.header().entry_type();
        let mode = entry.header().mode().ok();

        match entry_type {
            EntryType::Directory => {
                create_dir_with_mode(&target, mode)?;
                summary.directories += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                write_file(&mut entry, &target, mode, &name)?;
                summary.files += 1;
            }
            EntryType::XGlobalHeader | EntryType::XHeader | EntryType::GNULongName | EntryType::GNULongLink => {
                log_debug!("[Extract] Ignoring metadata entry {}", name);
            }
            other => {
                log_warn!(
                    "[Extract] Skipping {:?} entry {} (only regular files and directories are extracted)",
                    other,
                    name.yellow()
                );
                summary.skipped.push(name);
            }
        }
    }

    report(&summary, dest);
    Ok(summary)
}

/// Unpacks a zip archive into `dest`, stripping the wrapper segment.
///
/// Zip needs random access to its central directory, so the input must be
/// seekable (the Windows install path downloads to a temporary file first).
pub fn extract_zip<R: Read + Seek>(reader: R, dest: &Path) -> Result<ExtractionSummary> {
    log_debug!("[Extract] Unpacking zip archive into {}", dest.display());
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| NodeswapError::archive_with_source("cannot open zip archive", e))?;
    let mut summary = ExtractionSummary::default();

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| NodeswapError::archive_with_source("corrupt zip entry", e))?;
        let name = file.name().to_string();

        let Some(relative) = strip_wrapper_segment(&name) else {
            continue;
        };
        if !is_contained(&relative) {
            log_warn!("[Extract] Skipping entry with unsafe path: {}", name.red());
            summary.skipped.push(name);
            continue;
        }
        let target = dest.join(&relative);
        let mode = file.unix_mode();

        if file.is_dir() {
            create_dir_with_mode(&target, mode)?;
            summary.directories += 1;
        } else {
            write_file(&mut file, &target, mode, &name)?;
            summary.files += 1;
        }
    }

    report(&summary, dest);
    Ok(summary)
}

fn report(summary: &ExtractionSummary, dest: &Path) {
    if !summary.skipped.is_empty() {
        log_warn!(
            "[Extract] {} entries were not extracted (links and special files are not supported)",
            summary.skipped.len()
        );
    }
    log_debug!(
        "[Extract] {} files and {} directories written to {}",
        summary.files,
        summary.directories,
        dest.display()
    );
}

fn create_dir_with_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        if let Some(mode) = mode {
            builder.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .map_err(|e| NodeswapError::filesystem("Failed to create directory", path, e))
}

fn write_file<R: Read>(entry: &mut R, target: &Path, mode: Option<u32>, name: &str) -> Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| NodeswapError::filesystem("Failed to create directory", parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file: File = options
        .open(target)
        .map_err(|e| NodeswapError::filesystem("Failed to create file", target, e))?;

    copy_stream(
        entry,
        &mut file,
        |e| NodeswapError::archive_with_source(format!("cannot read body of {name}"), e),
        |e| NodeswapError::filesystem("Failed to write file", target, e),
    )
}
