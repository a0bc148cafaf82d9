// Wires configuration, transport and the platform path manager together once
// per process. Commands borrow the managers they need from here.

use crate::errors::Result;
use crate::libs::activation_manager::ActivationManager;
use crate::libs::config_loading::{EnvOverrides, load_config};
use crate::libs::install_manager::InstallManager;
use crate::libs::path_manager::{self, PathManager, ShellEnv};
use crate::libs::remote_catalog::RemoteCatalogClient;
use crate::libs::utilities::assets::{Downloader, HttpDownloader};
use crate::libs::utilities::platform::HostPlatform;
use crate::schemas::config::Config;

pub struct AppContext {
    pub config: Config,
    pub shell_env: ShellEnv,
    downloader: Box<dyn Downloader>,
    path_manager: Box<dyn PathManager>,
}

impl AppContext {
    /// Applies `overrides` on top of `config.toml` for the host platform.
    pub fn from_environment(overrides: &EnvOverrides) -> Result<Self> {
        let config = load_config(overrides, HostPlatform::current())?;
        let shell_env = ShellEnv::from_process();
        let downloader = Box::new(HttpDownloader::new(config.http_timeout));
        let path_manager = path_manager::for_platform(&config.platform, &shell_env);

        Ok(AppContext {
            config,
            shell_env,
            downloader,
            path_manager,
        })
    }

    pub fn installer(&self) -> InstallManager<'_> {
        InstallManager::new(&self.config, self.downloader.as_ref())
    }

    pub fn activation(&self) -> ActivationManager<'_> {
        ActivationManager::new(&self.config, self.path_manager.as_ref(), &self.shell_env)
    }

    pub fn catalog(&self) -> RemoteCatalogClient<'_> {
        RemoteCatalogClient::new(&self.config.dist_url, self.downloader.as_ref())
    }
}
