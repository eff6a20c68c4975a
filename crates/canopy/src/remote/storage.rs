//! Google Cloud Storage uploads (the bucket behind Firebase Storage).

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{CanopyError, Result};

use super::config::RemoteConfig;
use super::store::ObjectStore;

/// JSON API media upload endpoint.
const UPLOAD_URL: &str = "https://storage.googleapis.com/upload/storage/v1/b";

/// Host serving public objects.
const PUBLIC_URL: &str = "https://storage.googleapis.com";

/// Uploads objects with a `publicRead` ACL in a single request.
pub struct CloudStorage {
    client: Client,
    bucket: String,
    access_token: String,
}

impl CloudStorage {
    /// Create a client for `bucket` authenticated with a bearer token.
    pub fn new(
        bucket: impl Into<String>,
        access_token: impl Into<String>,
        config: &RemoteConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CanopyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bucket: bucket.into(),
            access_token: access_token.into(),
        })
    }

    /// Bucket and token both taken from the config.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(config.require_bucket()?, config.require_token()?, config)
    }

    /// Public URL of an object in this bucket.
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", PUBLIC_URL, self.bucket, name)
    }
}

impl ObjectStore for CloudStorage {
    fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let url = format!("{}/{}/o", UPLOAD_URL, self.bucket);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("uploadType", "media"),
                ("name", name),
                ("predefinedAcl", "publicRead"),
            ])
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .map_err(|e| CanopyError::Storage(format!("upload of '{}' failed: {}", name, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(CanopyError::Storage(format!(
                "upload of '{}' failed ({}): {}",
                name, status, error_text
            )));
        }

        Ok(self.public_url(name))
    }
}
