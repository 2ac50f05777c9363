//! ThingSpeak read API client.
//!
//! Thin wrapper over three GET endpoints:
//!
//! - `/channels/{id}/feeds/last.json`: the latest entry
//! - `/channels/{id}.json`: channel metadata
//! - `/channels/{id}/feeds.json`: a page of recent entries
//!
//! The optional read key is appended to every request as the `api_key` query
//! parameter.
//!
//! ## Example
//!
//! ```rust,no_run
//! use envwatch::source::{FeedApi, ThingSpeakClient};
//!
//! # tokio_test::block_on(async {
//! let client = ThingSpeakClient::builder()
//!     .channel("2983726")
//!     .read_api_key(Some("XXXXXXXXXXXXXXXX".to_string()))
//!     .build()
//!     .unwrap();
//!
//! if let Some(entry) = client.latest_entry().await.unwrap() {
//!     println!("temperature: {:?}", entry.field1);
//! }
//! # });
//! ```

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::feed::{ChannelMetadata, FeedEntry, FeedPage};
use crate::error::FetchError;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";

/// Parameters for the entries (history) endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntriesQuery {
    /// Number of most recent entries to return.
    pub results: Option<u32>,
    /// Start of the time window (`YYYY-MM-DD HH:NN:SS`).
    pub start: Option<String>,
    /// End of the time window (`YYYY-MM-DD HH:NN:SS`).
    pub end: Option<String>,
}

impl EntriesQuery {
    /// Query for the `results` most recent entries.
    pub fn latest(results: u32) -> Self {
        Self {
            results: Some(results),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(results) = self.results {
            params.push(("results", results.to_string()));
        }
        if let Some(ref start) = self.start {
            params.push(("start", start.clone()));
        }
        if let Some(ref end) = self.end {
            params.push(("end", end.clone()));
        }
        params
    }
}

/// Read access to a sensor feed.
///
/// Implemented by [`ThingSpeakClient`]; the polling driver only depends on
/// this trait so it can be driven by an in-memory feed in tests.
#[async_trait]
pub trait FeedApi: Send + Sync + Debug {
    /// Fetch the most recent entry, or `None` if the channel has no entries.
    async fn latest_entry(&self) -> Result<Option<FeedEntry>, FetchError>;

    /// Fetch the channel metadata.
    async fn channel_info(&self) -> Result<ChannelMetadata, FetchError>;

    /// Fetch a page of entries.
    async fn entries(&self, query: &EntriesQuery) -> Result<FeedPage, FetchError>;

    /// Human-readable description of the feed, for the status bar.
    fn description(&self) -> String;
}

/// HTTP client for one ThingSpeak channel.
#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    client: Client,
    base_url: String,
    channel_id: String,
    read_api_key: Option<String>,
}

impl ThingSpeakClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ThingSpeakClientBuilder {
        ThingSpeakClientBuilder::default()
    }

    /// The channel this client reads from.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    async fn get_json(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
        what: &'static str,
    ) -> Result<Value, FetchError> {
        if let Some(ref key) = self.read_api_key {
            params.push(("api_key", key.clone()));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, what, "requesting");

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                what,
                status: response.status().as_u16(),
            });
        }

        let value = response.json::<Value>().await?;
        Ok(value)
    }
}

#[async_trait]
impl FeedApi for ThingSpeakClient {
    async fn latest_entry(&self) -> Result<Option<FeedEntry>, FetchError> {
        let path = format!("/channels/{}/feeds/last.json", self.channel_id);
        let value = self.get_json(&path, Vec::new(), "latest entry").await?;
        Ok(FeedEntry::from_value(value)?)
    }

    async fn channel_info(&self) -> Result<ChannelMetadata, FetchError> {
        let path = format!("/channels/{}.json", self.channel_id);
        let value = self.get_json(&path, Vec::new(), "channel info").await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn entries(&self, query: &EntriesQuery) -> Result<FeedPage, FetchError> {
        let path = format!("/channels/{}/feeds.json", self.channel_id);
        let value = self.get_json(&path, query.params(), "entries").await?;
        Ok(serde_json::from_value(value)?)
    }

    fn description(&self) -> String {
        format!("{}/channels/{}", self.base_url, self.channel_id)
    }
}

/// Builder for [`ThingSpeakClient`].
#[derive(Debug, Default)]
pub struct ThingSpeakClientBuilder {
    base_url: Option<String>,
    channel_id: Option<String>,
    read_api_key: Option<String>,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl ThingSpeakClientBuilder {
    /// Set the API endpoint (default: `https://api.thingspeak.com`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the channel to read.
    pub fn channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Set the read API key (public channels need none).
    pub fn read_api_key(mut self, key: Option<String>) -> Self {
        self.read_api_key = key.filter(|k| !k.is_empty());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client instead of building one.
    ///
    /// The timeout setting is ignored when a client is supplied.
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ThingSpeakClient, FetchError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout.unwrap_or(Duration::from_secs(10)))
                .build()?,
        };

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(ThingSpeakClient {
            client,
            base_url,
            channel_id: self.channel_id.unwrap_or_default(),
            read_api_key: self.read_api_key,
        })
    }
}
