use crate::libs::app_context::AppContext;
use anyhow::Context;

/// `nodeswap use <version> [--print-env]`
pub fn run(ctx: &AppContext, version: &str, print_env: bool) -> anyhow::Result<()> {
    ctx.activation()
        .use_version(version, print_env)
        .with_context(|| format!("switching to Node.js {version} failed"))?;
    Ok(())
}
