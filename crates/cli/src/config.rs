//! Environment configuration.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use missiondesk_client::ClientConfig;
use tracing::info;

/// Runtime settings for the binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub home: PathBuf,
    pub page_size: usize,
    pub timeout: Duration,
    pub upload_bucket: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            api_url: try_load("MISSIONDESK_API_URL", missiondesk_client::config::DEFAULT_BASE_URL)?,
            home: try_load("MISSIONDESK_HOME", ".missiondesk")?,
            page_size: try_load("MISSIONDESK_PAGE_SIZE", "6")?,
            timeout: Duration::from_secs(try_load("MISSIONDESK_TIMEOUT_SECS", "120")?),
            upload_bucket: try_load("MISSIONDESK_UPLOAD_BUCKET", missiondesk_work::DEFAULT_BUCKET)?,
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, home: Option<PathBuf>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(home) = home {
            self.home = home;
        }
        self
    }

    pub fn client(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.as_str()).with_timeout(self.timeout)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
