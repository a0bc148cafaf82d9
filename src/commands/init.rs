use crate::libs::app_context::AppContext;
use crate::log_info;
use colored::Colorize;

/// The layout itself is created by `main` before any command runs; this only reports it.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    log_info!(
        "nodeswap is set up in {}",
        ctx.config.app_dir.display().to_string().cyan()
    );
    log_info!(
        "Add {} to your PATH, or run 'nodeswap use <version>' to do it automatically",
        ctx.config.executable_dir().display().to_string().cyan()
    );
    Ok(())
}
