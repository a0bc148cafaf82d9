// Fetches the list of published versions from `{dist_url}/index.json`.
// The index is fetched fresh on every call; nothing is cached.

use crate::errors::{NodeswapError, Result};
use crate::libs::utilities::assets::Downloader;
use crate::log_debug;
use crate::schemas::catalog::RemoteCatalogEntry;

pub struct RemoteCatalogClient<'a> {
    dist_url: &'a str,
    downloader: &'a dyn Downloader,
}

impl<'a> RemoteCatalogClient<'a> {
    pub fn new(dist_url: &'a str, downloader: &'a dyn Downloader) -> Self {
        RemoteCatalogClient { dist_url, downloader }
    }

    pub fn index_url(&self) -> String {
        format!("{}/index.json", self.dist_url)
    }

    /// Downloads and decodes the index, newest release first (mirror order).
    ///
    /// A transport failure while the body is being read surfaces through
    /// `serde_json` as an I/O error; it is reported as `Network`, not as a
    /// malformed payload.
    pub fn fetch_catalog(&self) -> Result<Vec<RemoteCatalogEntry>> {
        let url = self.index_url();
        let body = self.downloader.open(&url)?;

        let entries: Vec<RemoteCatalogEntry> = serde_json::from_reader(body).map_err(|e| {
            if e.is_io() {
                NodeswapError::network(&url, format!("reading the index failed: {e}"))
            } else {
                NodeswapError::CatalogFormat {
                    url: url.clone(),
                    source: e,
                }
            }
        })?;

        log_debug!("[Catalog] {} releases listed at {}", entries.len(), url);
        Ok(entries)
    }
}
