use crate::core::types::TileAddress;
use crate::util::error::RoadTilesError;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// A TMS-style tile server.
///
/// Tiles are addressed as `base/[layers/]z/y/x.format[suffix]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSource {
    pub base_url: String,
    pub format: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub layers: Option<String>,
}

impl TileSource {
    /// Create a source serving `format` tiles under `base_url`.
    ///
    /// # Example
    /// ```
    /// use roadtiles::{TileAddress, TileSource};
    ///
    /// let source = TileSource::new("http://tiles.example.com/osm/", "json")
    ///     .with_layers("roads")
    ///     .with_suffix("?api_key=abc");
    /// let url = source.url_for(&TileAddress::new(686, 1583, 12));
    /// assert_eq!(url, "http://tiles.example.com/osm/roads/12/1583/686.json?api_key=abc");
    /// ```
    pub fn new(base_url: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            format: format.into(),
            suffix: String::new(),
            layers: None,
        }
    }

    /// Appended verbatim after the file extension, e.g. a query string.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = Some(layers.into());
        self
    }

    pub fn url_for(&self, tile: &TileAddress) -> String {
        let mut url = self.base_url.clone();
        if !url.ends_with('/') {
            url.push('/');
        }
        if let Some(layers) = &self.layers {
            url.push_str(layers);
            url.push('/');
        }
        url.push_str(&format!(
            "{}/{}/{}.{}{}",
            tile.z, tile.y, tile.x, self.format, self.suffix
        ));
        url
    }
}

/// Retrieves raw tile payloads by URL.
///
/// Any failure is reported as [`RoadTilesError::Fetch`], which callers may
/// retry.
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RoadTilesError>;
}

/// Blocking HTTP fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

const USER_AGENT: &str = concat!("roadtiles/", env!("CARGO_PKG_VERSION"));

impl HttpFetcher {
    pub fn new() -> Result<Self, RoadTilesError> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RoadTilesError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RoadTilesError::IoError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl TileFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RoadTilesError> {
        debug!(url, "fetching tile");

        let fetch_error = |reason: String| RoadTilesError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| fetch_error(format!("Failed to read response: {}", e)))
    }
}

/// Wraps a fetcher and retries transient failures with exponential backoff.
///
/// Non-transient errors are returned immediately.
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    max_retries: u32,
    backoff: Duration,
}

impl<F: TileFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: TileFetcher> TileFetcher for RetryingFetcher<F> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RoadTilesError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(url) {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt));
                    warn!(url, attempt = attempt + 1, error = %e, "fetch failed, retrying");
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
