use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::polymarket::GAMMA_API_BASE;

const DEFAULT_USER_AGENT: &str = concat!("polylookup/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Upstream Gamma API
    pub gamma_api_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,

    // Event fan-out
    pub fan_out_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            gamma_api_url: GAMMA_API_BASE.into(),
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.into(),
            fan_out_concurrency: 8,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fan_out_concurrency: usize = match lookup("FAN_OUT_CONCURRENCY") {
            Some(v) => v.trim().parse().context("FAN_OUT_CONCURRENCY must be a positive integer")?,
            None => defaults.fan_out_concurrency,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: match lookup("PORT") {
                Some(v) => v.trim().parse().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            gamma_api_url: lookup("GAMMA_API_URL").unwrap_or(defaults.gamma_api_url),
            request_timeout_secs: match lookup("REQUEST_TIMEOUT_SECS") {
                Some(v) => v
                    .trim()
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
                None => defaults.request_timeout_secs,
            },
            user_agent: lookup("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
            fan_out_concurrency: fan_out_concurrency.max(1),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
