// Core of nodeswap: everything between the command layer and the file system.

// Switching, listing and removing installed versions.
pub mod activation_manager;
// Per-process wiring of config, transport and path manager.
pub mod app_context;
// Builds `Config` from defaults, config.toml and the environment.
pub mod config_loading;
// Downloads and installs a version into versions/.
pub mod install_manager;
// Pointer construction and PATH handling per OS family.
pub mod path_manager;
// Application directory resolution.
pub mod paths;
// Remote version index.
pub mod remote_catalog;
// Download URLs and Windows strategy probing.
pub mod version_resolver;
// Shared building blocks: archives, downloads, files, platform tokens.
pub mod utilities;

#[cfg(test)]
pub mod test_support;
