use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Environment variable holding the API key for the evaluation client.
pub const ENV_API_KEY: &str = "FLAGWATCH_API_KEY";
/// Environment variable holding the base URL for flag definitions.
pub const ENV_BASE_URL: &str = "FLAGWATCH_BASE_URL";
/// Environment variable holding the base URL for event reporting.
pub const ENV_EVENT_URL: &str = "FLAGWATCH_EVENT_URL";
/// Environment variable holding the polling interval in seconds.
pub const ENV_POLL_INTERVAL: &str = "FLAGWATCH_POLL_INTERVAL";

/// Process configuration, read once at startup.
///
/// All values are required; [`Config::from_env`] fails before the polling
/// loop starts if any is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the evaluation client.
    pub api_key: String,
    /// Base URL for flag definitions.
    pub base_url: Url,
    /// Base URL for event/analytics reporting.
    pub events_url: Url,
    /// Fixed sleep between polling ticks.
    pub poll_interval: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let api_key = require(&lookup, ENV_API_KEY)?;
        let base_url = Url::parse(&require(&lookup, ENV_BASE_URL)?).map_err(Error::InvalidBaseUrl)?;
        let events_url =
            Url::parse(&require(&lookup, ENV_EVENT_URL)?).map_err(Error::InvalidBaseUrl)?;

        let raw_interval = require(&lookup, ENV_POLL_INTERVAL)?;
        let seconds: u64 = raw_interval.parse().map_err(|_| Error::InvalidEnv {
            name: ENV_POLL_INTERVAL,
            reason: format!("expected an integer number of seconds, got {raw_interval:?}"),
        })?;

        Ok(Config {
            api_key,
            base_url,
            events_url,
            poll_interval: Duration::from_secs(seconds),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String> {
    lookup(name).ok_or(Error::MissingEnv { name })
}
