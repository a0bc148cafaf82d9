// Error kinds surfaced by the install/activation core.
// Commands wrap these with `anyhow` context; `main` prints the chain and exits 1.

use crate::schemas::version::VersionId;
use std::io;
use std::path::{Path, PathBuf};

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, NodeswapError>;

/// Everything that can go wrong while installing, switching or removing a version.
#[derive(Debug, thiserror::Error)]
pub enum NodeswapError {
    /// A download, probe or catalog request failed or returned a non-success status.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The compressed stream or an archive header is malformed.
    #[error("malformed archive: {message}")]
    ArchiveFormat {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote index payload could not be decoded.
    #[error("malformed remote index at {url}")]
    CatalogFormat {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Creating, deleting, linking or writing something on disk failed.
    #[error("{message}: {}", path.display())]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// User input that cannot name a version directory.
    #[error("'{input}' is not a valid version: {reason}")]
    InvalidVersion { input: String, reason: &'static str },

    #[error("Node.js {version} is not installed. Run 'nodeswap install {requested}' first")]
    NotInstalled { version: VersionId, requested: String },

    #[error(
        "cannot uninstall Node.js {version} because it is the active version. Switch with 'nodeswap use <other-version>' first"
    )]
    CannotRemoveActiveVersion { version: VersionId },

    /// Neither a single archive nor individual binaries are published for this host.
    #[error("no compatible download found for Node.js {version} on {platform}")]
    UnsupportedPlatform { version: VersionId, platform: String },

    #[error("no version of Node.js is active")]
    NoActiveVersion,

    /// The persisted PATH (registry or shell rc file) could not be read or updated.
    #[error("could not update PATH: {message}")]
    Environment { message: String },

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl NodeswapError {
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        NodeswapError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn archive_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        NodeswapError::ArchiveFormat {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn filesystem(message: impl Into<String>, path: &Path, source: io::Error) -> Self {
        NodeswapError::Filesystem {
            message: message.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn environment(message: impl Into<String>) -> Self {
        NodeswapError::Environment {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_installed_names_install_command() {
        let err = NodeswapError::NotInstalled {
            version: VersionId::normalize("18.0.0"),
            requested: "18.0.0".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("v18.0.0"));
        assert!(message.contains("nodeswap install 18.0.0"));
    }

    #[test]
    fn test_filesystem_error_shows_path() {
        let err = NodeswapError::filesystem(
            "Failed to create version directory",
            Path::new("/tmp/nodeswap/versions/v1.0.0"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(
            err.to_string(),
            "Failed to create version directory: /tmp/nodeswap/versions/v1.0.0"
        );
    }
}
