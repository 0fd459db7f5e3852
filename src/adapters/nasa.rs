//! NASA APOD API client.
//!
//! Implements both [`MetadataSource`] and [`ByteFetcher`] over HTTPS.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use tracing::debug;

use super::{ByteFetcher, MetadataSource};
use crate::config::ApiSettings;
use crate::domain::ApodMetadata;

/// APOD API client
pub struct NasaClient {
    /// Endpoint, e.g. https://api.nasa.gov/planetary/apod
    base_url: String,
    /// API key sent as `api_key`
    api_key: String,
    /// HTTP client
    client: reqwest::Client,
}

impl NasaClient {
    /// Create a new client with a per-request timeout
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Create from config
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            settings.key.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// Build the metadata request URL for a date.
    ///
    /// `thumbs=true` makes the API include `thumbnail_url` for videos.
    fn metadata_url(&self, date: NaiveDate) -> Result<Url> {
        let date = date.format("%Y-%m-%d").to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("api_key", self.api_key.as_str()),
                ("date", date.as_str()),
                ("thumbs", "true"),
            ],
        )
        .with_context(|| format!("Invalid APOD API URL: {}", self.base_url))
    }
}

#[async_trait]
impl MetadataSource for NasaClient {
    fn name(&self) -> &str {
        "nasa"
    }

    async fn fetch_metadata(&self, date: NaiveDate) -> Result<ApodMetadata> {
        let url = self.metadata_url(date)?;
        debug!(%date, "Requesting APOD metadata");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request APOD info for {}", date))?
            .error_for_status()
            .with_context(|| format!("APOD API rejected request for {}", date))?;

        response
            .json::<ApodMetadata>()
            .await
            .context("Failed to parse APOD API response")
    }
}

#[async_trait]
impl ByteFetcher for NasaClient {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Downloading image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?
            .error_for_status()
            .with_context(|| format!("Download of {} failed", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        Ok(bytes.to_vec())
    }
}
