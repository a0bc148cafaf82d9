// Data structures for the remote distribution index (`{dist_url}/index.json`).

use crate::schemas::version::VersionId;
use chrono::NaiveDate;
use serde::Deserialize;

/// The `lts` field of the index is either `false` or the release line's codename.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LtsTag {
    Flag(bool),
    Codename(String),
}

impl Default for LtsTag {
    fn default() -> Self {
        LtsTag::Flag(false)
    }
}

/// One published version as listed in the remote index.
///
/// Only the fields the manager uses are decoded; everything else in the
/// payload (v8, uv, openssl, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCatalogEntry {
    /// Version identifier, e.g. `v20.11.1`.
    pub version: VersionId,
    /// Release date as published, `YYYY-MM-DD`.
    pub date: String,
    /// Artifact tokens published for this version (`linux-x64`, `win-x64-zip`, ...).
    #[serde(default)]
    pub files: Vec<String>,
    /// Bundled npm version, absent for very old releases.
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub lts: LtsTag,
}

impl RemoteCatalogEntry {
    /// The LTS codename (`Iron`, `Hydrogen`, ...) when the release belongs to an LTS line.
    pub fn lts_codename(&self) -> Option<&str> {
        match &self.lts {
            LtsTag::Codename(name) => Some(name.as_str()),
            LtsTag::Flag(_) => None,
        }
    }

    pub fn released_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Whether an artifact token is published, e.g. `has_file("win-x64-zip")`.
    pub fn has_file(&self, token: &str) -> bool {
        self.files.iter().any(|file| file == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"version":"v20.11.1","date":"2024-02-14","files":["linux-x64","win-x64-zip"],"npm":"10.2.4","v8":"11.3.244.8","lts":"Iron","security":true},
        {"version":"v21.6.2","date":"2024-02-14","files":["linux-x64"],"lts":false}
    ]"#;

    #[test]
    fn test_decode_index_entries() {
        let entries: Vec<RemoteCatalogEntry> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version.as_str(), "v20.11.1");
        assert_eq!(entries[0].lts_codename(), Some("Iron"));
        assert_eq!(entries[0].npm.as_deref(), Some("10.2.4"));
        assert!(entries[0].has_file("win-x64-zip"));
        assert_eq!(entries[1].lts_codename(), None);
        assert!(entries[1].npm.is_none());
    }

    #[test]
    fn test_released_on_parses_date() {
        let entries: Vec<RemoteCatalogEntry> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            entries[0].released_on(),
            NaiveDate::from_ymd_opt(2024, 2, 14)
        );
    }
}
