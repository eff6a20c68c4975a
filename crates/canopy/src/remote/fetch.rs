//! HTTP image download.

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{CanopyError, Result};

use super::config::RemoteConfig;
use super::store::ImageFetcher;

/// Downloads source images with a browser user agent; some image hosts
/// refuse the default one.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Build a fetcher with the configured timeout and user agent.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CanopyError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| CanopyError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(fetch_error(format!("status {}", response.status())));
        }

        let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
