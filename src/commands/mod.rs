// Register application subcommands.
// Each module corresponds to a specific `nodeswap` command-line action.

use crate::cli::cmd_enums::Commands;
use crate::libs::app_context::AppContext;

// Switches the active version (`use`).
pub mod activate;
// `current` and `which`.
pub mod current;
// Sets up the directory layout.
pub mod init;
// Downloads and installs a version.
pub mod install;
// Local and remote listings.
pub mod list;
// PATH and reachability report.
pub mod status;
// Removes an installed version.
pub mod uninstall;

/// Runs the selected subcommand.
pub fn dispatch(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Install { version } => install::run(ctx, &version),
        Commands::Use { version, print_env } => activate::run(ctx, &version, print_env),
        Commands::List => list::run_local(ctx),
        Commands::ListRemote => list::run_remote(ctx),
        Commands::Current => current::run_current(ctx),
        Commands::Which => current::run_which(ctx),
        Commands::Uninstall { version } => uninstall::run(ctx, &version),
        Commands::Status => status::run(ctx),
        Commands::Init => init::run(ctx),
    }
}
