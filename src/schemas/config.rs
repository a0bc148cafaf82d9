// Defines the runtime configuration handed to every component, and the shape
// of the optional `config.toml` it can be loaded from.

use crate::libs::utilities::platform::HostPlatform;
use crate::schemas::version::VersionId;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Official distribution mirror.
pub const DEFAULT_DIST_URL: &str = "https://nodejs.org/dist";
/// Connect/read deadline applied to every HTTP request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// How many remote versions `list-remote` prints before truncating.
pub const DEFAULT_REMOTE_LIST_LIMIT: usize = 20;

/// The optional `~/.nodeswap/config.toml`. Every field may be omitted.
///
/// ```toml
/// dist_url = "https://mirrors.example.com/node/dist"
/// timeout_secs = 60
/// remote_list_limit = 40
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub dist_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub remote_list_limit: Option<usize>,
}

/// Immutable configuration: paths, platform tokens and the mirror URL.
///
/// Built once by `config_loading::load_config` and passed by reference into
/// the resolver, installer and activation manager.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of all managed state, `~/.nodeswap` by default.
    pub app_dir: PathBuf,
    /// Base URL of the distribution mirror, without a trailing slash.
    pub dist_url: String,
    pub platform: HostPlatform,
    pub http_timeout: Duration,
    pub remote_list_limit: usize,
}

impl Config {
    pub fn new(app_dir: PathBuf, platform: HostPlatform) -> Self {
        Config {
            app_dir,
            dist_url: DEFAULT_DIST_URL.to_string(),
            platform,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            remote_list_limit: DEFAULT_REMOTE_LIST_LIMIT,
        }
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.app_dir.join("versions")
    }

    pub fn version_dir(&self, version: &VersionId) -> PathBuf {
        self.versions_dir().join(version.as_str())
    }

    /// The active pointer (`current`).
    pub fn pointer_path(&self) -> PathBuf {
        self.app_dir.join("current")
    }

    /// Empty directory the pointer targets when no version is active.
    pub fn placeholder_dir(&self) -> PathBuf {
        self.app_dir.join("empty")
    }

    pub fn config_file(&self) -> PathBuf {
        self.app_dir.join("config.toml")
    }

    /// Directory that has to be on PATH for the active `node` to be found.
    /// Windows distributions keep `node.exe` at the root, Unix ones under `bin/`.
    pub fn executable_dir(&self) -> PathBuf {
        if self.platform.is_windows() {
            self.pointer_path()
        } else {
            self.pointer_path().join("bin")
        }
    }

    /// Expected path of the active `node` executable.
    pub fn node_executable(&self) -> PathBuf {
        self.executable_dir()
            .join(self.platform.executable_name("node"))
    }

    /// Expected path of the active `npm` launcher.
    pub fn npm_executable(&self) -> PathBuf {
        let name = if self.platform.is_windows() { "npm.cmd" } else { "npm" };
        self.executable_dir().join(name)
    }
}
