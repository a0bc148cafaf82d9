// `current` asks the active executable; `which` prints where it lives.

use crate::libs::app_context::AppContext;

pub fn run_current(ctx: &AppContext) -> anyhow::Result<()> {
    let version = ctx.activation().show_current()?;
    println!("{version}");
    Ok(())
}

pub fn run_which(ctx: &AppContext) -> anyhow::Result<()> {
    let executable = ctx.activation().show_which()?;
    println!("{}", executable.display());
    Ok(())
}
