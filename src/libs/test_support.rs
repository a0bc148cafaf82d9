// Fixtures shared by the unit tests: an in-memory downloader, a scripted
// command runner and builders for distribution-shaped archives.

use crate::errors::{NodeswapError, Result};
use crate::libs::path_manager::{CommandOutput, CommandRunner};
use crate::libs::utilities::assets::Downloader;
use crate::libs::utilities::platform::HostPlatform;
use crate::schemas::config::Config;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use tar::{EntryType, Header};

pub const TEST_DIST_URL: &str = "https://mirror.test/dist";

/// A `Config` rooted inside a test sandbox, pointed at the fake mirror.
pub fn sandbox_config(root: &Path, os: &str) -> Config {
    let mut config = Config::new(root.join(".nodeswap"), HostPlatform::new(os, "x86_64"));
    config.dist_url = TEST_DIST_URL.to_string();
    config
}

/// Serves canned bodies by URL and records every request it sees.
#[derive(Default)]
pub struct FakeDownloader {
    bodies: HashMap<String, Vec<u8>>,
    advertised: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        FakeDownloader::default()
    }

    /// Makes `url` answer both probes and downloads with `body`.
    pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    /// Makes `url` answer probes while every download of it fails.
    pub fn advertise(mut self, url: &str) -> Self {
        self.advertised.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.strip_prefix("GET ").map(str::to_string))
            .collect()
    }
}

impl Downloader for FakeDownloader {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        self.requests.borrow_mut().push(format!("GET {url}"));
        match self.bodies.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(NodeswapError::network(url, "server responded with status 404")),
        }
    }

    fn exists(&self, url: &str) -> bool {
        self.requests.borrow_mut().push(format!("HEAD {url}"));
        self.bodies.contains_key(url) || self.advertised.contains(url)
    }
}

/// Answers commands from a script keyed by program name and records every call.
/// Unscripted programs fail. A hook can emulate side effects (e.g. `mklink`
/// creating the junction).
#[derive(Default)]
pub struct FakeRunner {
    outputs: HashMap<String, CommandOutput>,
    hooks: HashMap<String, Box<dyn Fn(&[String])>>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        FakeRunner::default()
    }

    pub fn respond(mut self, program: &str, success: bool, stdout: &str) -> Self {
        self.outputs.insert(
            program.to_string(),
            CommandOutput {
                success,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Scripts `program` to exit unsuccessfully with `stderr`.
    pub fn fail(mut self, program: &str, stderr: &str) -> Self {
        self.outputs.insert(
            program.to_string(),
            CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn on_run(mut self, program: &str, hook: impl Fn(&[String]) + 'static) -> Self {
        self.hooks.insert(program.to_string(), Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(program, _)| program).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        if let Some(hook) = self.hooks.get(program) {
            hook(args);
        }
        Ok(self.outputs.get(program).cloned().unwrap_or(CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: format!("{program}: not scripted"),
        }))
    }
}

/// One entry of a generated tarball.
pub enum TarEntry {
    Dir { path: String, mode: u32 },
    File { path: String, data: Vec<u8>, mode: u32 },
    Symlink { path: String, target: String },
}

impl TarEntry {
    pub fn dir(path: &str, mode: u32) -> Self {
        TarEntry::Dir { path: path.to_string(), mode }
    }

    pub fn file(path: &str, data: &[u8], mode: u32) -> Self {
        TarEntry::File { path: path.to_string(), data: data.to_vec(), mode }
    }

    pub fn symlink(path: &str, target: &str) -> Self {
        TarEntry::Symlink { path: path.to_string(), target: target.to_string() }
    }
}

pub fn build_tar_gz(entries: &[TarEntry]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = Header::new_gnu();
        match entry {
            TarEntry::Dir { path, mode } => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(*mode);
                header.set_size(0);
                builder.append_data(&mut header, path, io::empty()).unwrap();
            }
            TarEntry::File { path, data, mode } => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(*mode);
                header.set_size(data.len() as u64);
                builder.append_data(&mut header, path, data.as_slice()).unwrap();
            }
            TarEntry::Symlink { path, target } => {
                header.set_entry_type(EntryType::Symlink);
                header.set_mode(0o777);
                header.set_size(0);
                builder.append_link(&mut header, path, target).unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Builds a zip; `None` bodies become directory entries.
pub fn build_zip(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();

    for (name, body) in entries {
        match body {
            None => writer.add_directory(*name, options).unwrap(),
            Some(data) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

/// A Unix distribution tarball whose `bin/node` is a shell script printing `version`.
pub fn node_tarball(version: &str, platform: &str) -> Vec<u8> {
    let wrapper = format!("node-{version}-{platform}");
    let script = format!("#!/bin/sh\necho {version}\n");
    build_tar_gz(&[
        TarEntry::dir(&format!("{wrapper}/"), 0o755),
        TarEntry::dir(&format!("{wrapper}/bin/"), 0o755),
        TarEntry::file(&format!("{wrapper}/bin/node"), script.as_bytes(), 0o755),
        TarEntry::file(&format!("{wrapper}/include/node/node.h"), b"/* header */", 0o644),
    ])
}
