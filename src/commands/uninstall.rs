use crate::libs::app_context::AppContext;
use anyhow::Context;

pub fn run(ctx: &AppContext, version: &str) -> anyhow::Result<()> {
    ctx.activation()
        .uninstall(version)
        .with_context(|| format!("uninstalling Node.js {version} failed"))?;
    Ok(())
}
