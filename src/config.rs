//! Runtime configuration.
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `ENVWATCH_*` environment variables (e.g. `ENVWATCH_READ_API_KEY`)
//! 4. command-line flags
//!
//! ```toml
//! channel_id = "2983726"
//! read_api_key = "XXXXXXXXXXXXXXXX"
//! refresh_secs = 10
//! history_results = 30
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::source::ThingSpeakClient;

pub const DEFAULT_CHANNEL_ID: &str = "2983726";

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub channel_id: String,
    #[serde(default)]
    pub read_api_key: Option<String>,
    pub base_url: String,
    /// Seconds between poll cycles.
    pub refresh_secs: u64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Entries fetched at startup to seed history; 0 disables.
    pub history_results: u32,
}

/// Values given on the command line, applied over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub channel_id: Option<String>,
    pub read_api_key: Option<String>,
    pub base_url: Option<String>,
    pub refresh_secs: Option<u64>,
}

impl Settings {
    /// Load settings from defaults, an optional file, the environment and
    /// command-line overrides.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path, overrides, Environment::with_prefix("ENVWATCH"))
    }

    fn load_with_env(
        path: Option<&Path>,
        overrides: &Overrides,
        env: Environment,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("channel_id", DEFAULT_CHANNEL_ID)?
            .set_default("base_url", crate::source::DEFAULT_BASE_URL)?
            .set_default("refresh_secs", 10u64)?
            .set_default("timeout_secs", 10u64)?
            .set_default("history_results", 30u64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(env)
            .set_override_option("channel_id", overrides.channel_id.clone())?
            .set_override_option("read_api_key", overrides.read_api_key.clone())?
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("refresh_secs", overrides.refresh_secs)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.channel_id.trim().is_empty() {
            bail!("channel_id must not be empty");
        }
        if self.refresh_secs == 0 {
            bail!("refresh_secs must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    /// Build the API client these settings describe.
    pub fn client(&self) -> Result<ThingSpeakClient> {
        let client = ThingSpeakClient::builder()
            .base_url(&self.base_url)
            .channel(&self.channel_id)
            .read_api_key(self.read_api_key.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok(client)
    }
}
