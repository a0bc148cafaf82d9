use clap::{Parser, Subcommand};

/// Defines the command-line interface for `nodeswap`.
#[derive(Parser)]
#[command(name = "nodeswap")]
#[command(version, about = "Install and switch between Node.js versions", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Directory that holds installed versions and the active pointer.
    #[arg(long = "dir", value_name = "DIR", global = true, env = "NODESWAP_DIR")]
    pub(crate) app_dir: Option<String>,

    /// Mirror serving the Node.js distributions and index.json.
    #[arg(long, value_name = "URL", global = true, env = "NODESWAP_DIST_URL")]
    pub(crate) dist_url: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Every subcommand runs `init` first, so none of them require a prior setup step.
#[derive(Subcommand)]
pub enum Commands {
    /// Download and install a Node.js version (e.g. 18.17.0 or v18.17.0).
    Install {
        version: String,
    },
    /// Make an installed version the active one.
    Use {
        version: String,
        /// Print a snippet that updates PATH in the current shell:
        /// eval "$(nodeswap use 18.17.0 --print-env)"
        #[arg(long)]
        print_env: bool,
    },
    /// List installed versions, marking the active one.
    List,
    /// List versions published on the distribution mirror.
    ListRemote,
    /// Print the version reported by the active node.
    Current,
    /// Print the path of the active node executable.
    Which,
    /// Remove an installed version. The active version cannot be removed.
    Uninstall {
        version: String,
    },
    /// Show PATH setup and whether node and npm are reachable.
    Status,
    /// Create the nodeswap directory layout.
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_are_global_flags() {
        let cli = Cli::try_parse_from([
            "nodeswap",
            "install",
            "18.0.0",
            "--dir",
            "/opt/nodeswap",
            "--dist-url",
            "https://mirror.test/dist",
        ])
        .unwrap();

        assert_eq!(cli.app_dir.as_deref(), Some("/opt/nodeswap"));
        assert_eq!(cli.dist_url.as_deref(), Some("https://mirror.test/dist"));
        assert!(matches!(cli.command, Commands::Install { version } if version == "18.0.0"));
    }
}
