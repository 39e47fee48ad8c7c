//! Remote clip download.

use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Seam for downloading remote clips into scratch space.
pub trait ClipFetcher: Send + Sync {
    /// Write the body of `url` to `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> SlidecastResult<()>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Client whose whole request, body included, must finish within `timeout`.
    pub fn new(timeout: Duration) -> SlidecastResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SlidecastError::fetch(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ClipFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> SlidecastResult<()> {
        let mut resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SlidecastError::fetch(format!("GET {}: {e}", redact(url))))?;
        let mut file = std::fs::File::create(dest).map_err(|e| {
            SlidecastError::fetch(format!("create '{}': {e}", dest.display()))
        })?;
        let bytes = resp
            .copy_to(&mut file)
            .map_err(|e| SlidecastError::fetch(format!("read body of {}: {e}", redact(url))))?;
        tracing::info!(url = %redact(url), bytes, "downloaded clip");
        Ok(())
    }
}

/// URL without query string or fragment, for logs and errors.
pub fn redact(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
