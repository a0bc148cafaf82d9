mod cli;
mod commands;
mod errors;
mod libs;
mod logger;
mod schemas;

use crate::cli::cmd_enums::Cli;
use crate::libs::app_context::AppContext;
use crate::libs::config_loading::EnvOverrides;
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = EnvOverrides {
        app_dir: cli.app_dir,
        dist_url: cli.dist_url,
    };
    let ctx = AppContext::from_environment(&overrides).context("loading configuration failed")?;
    ctx.activation()
        .init()
        .with_context(|| format!("initializing {} failed", ctx.config.app_dir.display()))?;
    commands::dispatch(&ctx, cli.command)
}
