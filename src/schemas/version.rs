// Version identifiers as they appear in directory names, URLs and the remote index.

use crate::errors::{self, NodeswapError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

/// The marker every normalized version starts with.
pub const VERSION_PREFIX: char = 'v';

/// A normalized Node.js version string such as `v18.0.0`.
///
/// The inner string always starts with [`VERSION_PREFIX`]. Ordering is plain
/// lexicographic ordering of that string, which is how installed versions are
/// listed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VersionId(String);

impl VersionId {
    /// Normalizes user input into a `VersionId`.
    ///
    /// Surrounding whitespace is trimmed and the `v` marker is prepended when
    /// it is missing. Normalizing an already normalized value is a no-op, so
    /// `normalize("18.0.0") == normalize("v18.0.0")`.
    pub fn normalize(input: &str) -> VersionId {
        let trimmed = input.trim();
        if trimmed.starts_with(VERSION_PREFIX) {
            VersionId(trimmed.to_string())
        } else {
            VersionId(format!("{VERSION_PREFIX}{trimmed}"))
        }
    }

    /// Normalizes user input and checks that it can name a directory under
    /// `versions/`.
    ///
    /// The result has to be exactly one plain path component: no separators,
    /// no drive prefix, nothing but the `v` marker. Everything that joins a
    /// version onto a path goes through here first.
    pub fn parse(input: &str) -> errors::Result<VersionId> {
        let version = VersionId::normalize(input);
        let invalid = |reason: &'static str| NodeswapError::InvalidVersion {
            input: input.trim().to_string(),
            reason,
        };

        if version.0.len() == VERSION_PREFIX.len_utf8() {
            return Err(invalid("the version is empty"));
        }
        if version.0.contains(['/', '\\', ':']) {
            return Err(invalid("path separators are not allowed"));
        }
        if version.0.chars().any(char::is_control) {
            return Err(invalid("control characters are not allowed"));
        }
        let mut components = Path::new(&version.0).components();
        let single_component = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(name)), None) if name == version.0.as_str()
        );
        if !single_component {
            return Err(invalid("the version must be a single path component"));
        }
        Ok(version)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for VersionId {
    fn from(raw: String) -> Self {
        VersionId::normalize(&raw)
    }
}

impl From<VersionId> for String {
    fn from(version: VersionId) -> Self {
        version.0
    }
}

impl FromStr for VersionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(VersionId::normalize(s))
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
