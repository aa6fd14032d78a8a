//! Image download.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{PipelineError, Result};

/// Source of raw image bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the image at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches images over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Default request timeout.
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a fetcher with a default client.
    ///
    /// Falls back to a client without a timeout if the builder fails.
    pub fn new() -> Self {
        let client = match reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Failed to build image HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            }
        };
        Self { client }
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch(format!("{} returned {}", url, status)));
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
