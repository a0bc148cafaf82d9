//! Builds the runtime [`Config`].
//!
//! Precedence, lowest to highest:
//! 1. built-in defaults (`~/.nodeswap`, the official mirror, 30 s timeout),
//! 2. `<app_dir>/config.toml`,
//! 3. `--dir` / `--dist-url`, or their `NODESWAP_DIR` / `NODESWAP_DIST_URL`
//!    environment fallbacks.
//!
//! clap resolves flags and environment into [`EnvOverrides`] once, which keeps
//! [`load_config`] independent of the process environment.

use crate::errors::{NodeswapError, Result};
use crate::libs::paths::resolve_app_dir;
use crate::libs::utilities::platform::HostPlatform;
use crate::log_debug;
use crate::schemas::config::{Config, ConfigFile};
use colored::Colorize;
use std::fs;
use std::time::Duration;

/// Command-line or environment values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub app_dir: Option<String>,
    pub dist_url: Option<String>,
}

/// Loads the configuration for `platform`.
///
/// A missing `config.toml` is fine; an unreadable or malformed one is a
/// `Config` error, as is an unknown key or a zero timeout.
pub fn load_config(overrides: &EnvOverrides, platform: HostPlatform) -> Result<Config> {
    let app_dir = resolve_app_dir(overrides.app_dir.as_deref())?;
    let mut config = Config::new(app_dir, platform);

    let config_path = config.config_file();
    if config_path.is_file() {
        log_debug!("[Config] Reading {}", config_path.display().to_string().blue());
        let contents = fs::read_to_string(&config_path).map_err(|e| NodeswapError::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| NodeswapError::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        if let Some(dist_url) = file.dist_url {
            config.dist_url = dist_url;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            if timeout_secs == 0 {
                return Err(NodeswapError::Config {
                    path: config_path,
                    message: "timeout_secs must be greater than zero".to_string(),
                });
            }
            config.http_timeout = Duration::from_secs(timeout_secs);
        }
        if let Some(limit) = file.remote_list_limit {
            config.remote_list_limit = limit;
        }
    }

    if let Some(dist_url) = overrides.dist_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
        config.dist_url = dist_url.to_string();
    }

    config.dist_url = config.dist_url.trim().trim_end_matches('/').to_string();
    if config.dist_url.is_empty() {
        return Err(NodeswapError::Config {
            path: config_path,
            message: "dist_url must not be empty".to_string(),
        });
    }

    log_debug!("[Config] {:?}", config);
    Ok(config)
}
