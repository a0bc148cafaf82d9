use crate::libs::app_context::AppContext;
use crate::libs::install_manager::InstallOutcome;
use crate::log_info;
use anyhow::Context;
use colored::Colorize;

pub fn run(ctx: &AppContext, version: &str) -> anyhow::Result<()> {
    let outcome = ctx
        .installer()
        .install(version)
        .with_context(|| format!("installing Node.js {version} failed"))?;

    if matches!(outcome, InstallOutcome::Installed(_)) {
        log_info!(
            "Run {} to start using it",
            format!("nodeswap use {}", outcome.version()).cyan()
        );
    }
    Ok(())
}
