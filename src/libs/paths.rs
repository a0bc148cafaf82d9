// Resolves where nodeswap keeps its state.
use crate::errors::{NodeswapError, Result};
use crate::log_debug;
use std::path::PathBuf;

/// Directory name under the home directory when `NODESWAP_DIR` is not set.
pub const DEFAULT_APP_DIR_NAME: &str = ".nodeswap";

/// Expands a leading `~` to the home directory. Other paths are returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Resolves the application root: an explicit override (tilde-expanded) wins,
/// otherwise `~/.nodeswap`.
///
/// # Arguments
/// * `override_dir`: Value of `NODESWAP_DIR`, if set. Blank values are ignored.
pub fn resolve_app_dir(override_dir: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.map(str::trim).filter(|dir| !dir.is_empty()) {
        let resolved = expand_tilde(dir);
        log_debug!("[Paths] Using app directory override {}", resolved.display());
        return Ok(resolved);
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_APP_DIR_NAME))
        .ok_or_else(|| NodeswapError::environment("cannot determine the home directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_used_verbatim() {
        assert_eq!(
            resolve_app_dir(Some("/opt/nodeswap")).unwrap(),
            PathBuf::from("/opt/nodeswap")
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_app_dir(Some("~/custom")).unwrap(), home.join("custom"));
            assert_eq!(resolve_app_dir(Some("   ")).unwrap(), home.join(DEFAULT_APP_DIR_NAME));
            assert_eq!(resolve_app_dir(None).unwrap(), home.join(DEFAULT_APP_DIR_NAME));
        }
    }
}
