use crate::libs::app_context::AppContext;
use colored::Colorize;

fn check(ok: bool) -> colored::ColoredString {
    if ok { "✓".green() } else { "✗".red() }
}

pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let report = ctx.activation().status();
    let dir = report.executable_dir.display().to_string();

    println!("nodeswap status:");
    println!(
        "{} {} is on the persisted PATH",
        check(report.persisted_on_path),
        dir
    );
    println!(
        "{} {} is on this shell's PATH",
        check(report.session_on_path),
        dir
    );

    match &report.active_version {
        Some(version) => println!("{} Active version: {}", check(true), version),
        None => println!("{} No active version. Try: nodeswap use <version>", check(false)),
    }
    match &report.node_version {
        Some(version) => println!("{} node runs: {}", check(true), version),
        None => println!("{} node is not reachable through the pointer", check(false)),
    }
    match &report.npm_version {
        Some(version) => println!("{} npm runs: {}", check(true), version),
        None => println!("{} npm is not reachable through the pointer", "!".yellow()),
    }

    if !report.persisted_on_path {
        println!("  Run: nodeswap use <version> to add it automatically");
    }
    Ok(())
}
