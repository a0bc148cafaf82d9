//! `list` and `list-remote`. Listings go to stdout, hints to stderr.

use crate::libs::app_context::AppContext;
use crate::libs::utilities::platform::HostPlatform;
use crate::log_info;
use crate::schemas::catalog::RemoteCatalogEntry;
use anyhow::Context;
use colored::Colorize;
use prettytable::{Table, format, row};

pub fn run_local(ctx: &AppContext) -> anyhow::Result<()> {
    let versions = ctx.activation().list_local()?;
    if versions.is_empty() {
        log_info!("No versions installed. Try 'nodeswap install <version>'");
        return Ok(());
    }

    for local in versions {
        if local.active {
            println!("* {}", local.version.to_string().green());
        } else {
            println!("  {}", local.version);
        }
    }
    Ok(())
}

pub fn run_remote(ctx: &AppContext) -> anyhow::Result<()> {
    let catalog = ctx.catalog();
    let entries = catalog
        .fetch_catalog()
        .with_context(|| format!("fetching {} failed", catalog.index_url()))?;

    let limit = ctx.config.remote_list_limit;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(row!["VERSION", "RELEASED", "LTS", "NPM", "THIS HOST"]);
    for entry in entries.iter().take(limit) {
        let [version, released, lts, npm, host] = remote_row(entry, &ctx.config.platform);
        table.add_row(row![version, released, lts, npm, host]);
    }
    table.printstd();

    if entries.len() > limit {
        println!("... and {} more", entries.len() - limit);
    }
    Ok(())
}

/// Artifact tokens in the index that mean "installable on this host".
fn host_file_tokens(platform: &HostPlatform) -> Vec<String> {
    let base = format!("{}-{}", platform.platform_token(), platform.arch_token());
    if platform.is_windows() {
        vec![format!("{base}-zip"), format!("{base}-exe")]
    } else {
        vec![base]
    }
}

fn remote_row(entry: &RemoteCatalogEntry, platform: &HostPlatform) -> [String; 5] {
    let released = entry
        .released_on()
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| entry.date.clone());
    let available = host_file_tokens(platform)
        .iter()
        .any(|token| entry.has_file(token));

    [
        entry.version.to_string(),
        released,
        entry.lts_codename().unwrap_or("-").to_string(),
        entry.npm.clone().unwrap_or_else(|| "-".to_string()),
        if available { "yes" } else { "no" }.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> RemoteCatalogEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_remote_row_formats_fields() {
        let lts = entry(
            r#"{"version":"v18.16.0","date":"2023-04-12","files":["linux-x64","win-x64-zip"],"npm":"9.5.1","lts":"Hydrogen"}"#,
        );

        assert_eq!(
            remote_row(&lts, &HostPlatform::new("linux", "x86_64")),
            ["v18.16.0", "Apr 12, 2023", "Hydrogen", "9.5.1", "yes"].map(String::from)
        );
        assert_eq!(remote_row(&lts, &HostPlatform::new("macos", "aarch64"))[4], "no");
    }

    #[test]
    fn test_remote_row_old_windows_release() {
        let old = entry(r#"{"version":"v4.0.0","date":"not-a-date","files":["win-x64-exe"],"lts":false}"#);

        let row = remote_row(&old, &HostPlatform::new("windows", "amd64"));

        assert_eq!(row[1], "not-a-date");
        assert_eq!(row[2], "-");
        assert_eq!(row[3], "-");
        assert_eq!(row[4], "yes");
    }
}
