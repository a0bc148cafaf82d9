// Network access for distribution artifacts.
// Everything that talks HTTP goes through the `Downloader` trait so that the
// install flow can be driven by an in-memory fake in tests.

use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::file_operations::copy_stream;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Blocking transport for distribution artifacts.
pub trait Downloader {
    /// Issues a GET and returns the response body as a stream.
    /// Any non-success status is a `Network` error.
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>>;

    /// HEAD-style availability probe. Any failure counts as "not available".
    fn exists(&self, url: &str) -> bool;
}

/// `ureq`-backed downloader with connect and read deadlines.
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(&format!("nodeswap/{}", env!("CARGO_PKG_VERSION")))
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .build();
        HttpDownloader { agent }
    }
}

impl Downloader for HttpDownloader {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        log_debug!("[Download] GET {}", url);
        match self.agent.get(url).call() {
            Ok(response) => Ok(Box::new(response.into_reader())),
            Err(ureq::Error::Status(code, _)) => Err(NodeswapError::network(
                url,
                format!("server responded with status {code}"),
            )),
            Err(err) => Err(NodeswapError::network(url, err.to_string())),
        }
    }

    fn exists(&self, url: &str) -> bool {
        let available = matches!(self.agent.head(url).call(), Ok(response) if response.status() == 200);
        log_debug!("[Download] HEAD {} -> {}", url, available);
        available
    }
}

/// Downloads `url` into `dest`, creating or truncating the file.
///
/// Read failures on the body are `Network` errors, write failures are
/// `Filesystem` errors. On failure the partially written file is left for the
/// caller to remove.
///
/// # Returns
/// The number of bytes written.
pub fn download_to_file(downloader: &dyn Downloader, url: &str, dest: &Path) -> Result<u64> {
    log_info!("[Download] Downloading {}", url.blue());
    let mut body = downloader.open(url)?;
    let mut file = File::create(dest)
        .map_err(|e| NodeswapError::filesystem("Failed to create download target", dest, e))?;

    let written = copy_stream(
        &mut body,
        &mut file,
        |e| NodeswapError::network(url, format!("download interrupted: {e}")),
        |e| NodeswapError::filesystem("Failed to write download", dest, e),
    )?;

    log_debug!(
        "[Download] Saved {} bytes to {}",
        written,
        dest.display().to_string().green()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::test_support::FakeDownloader;
    use tempfile::TempDir;

    #[test]
    fn test_download_to_file_writes_body() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("node.exe");
        let downloader = FakeDownloader::new().serve("https://mirror/node.exe", b"MZ binary".to_vec());

        let written = download_to_file(&downloader, "https://mirror/node.exe", &dest).unwrap();

        assert_eq!(written, 9);
        assert_eq!(std::fs::read(&dest).unwrap(), b"MZ binary");
    }

    #[test]
    fn test_download_missing_url_is_network_error() {
        let temp = TempDir::new().unwrap();
        let downloader = FakeDownloader::new();

        let err = download_to_file(&downloader, "https://mirror/missing", &temp.path().join("x")).unwrap_err();

        assert!(matches!(err, NodeswapError::Network { .. }));
        assert!(!temp.path().join("x").exists());
    }
}
