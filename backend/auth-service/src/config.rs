/// Configuration management
use serde::Deserialize;
use std::time::Duration;

fn default_access_ttl_secs() -> u64 {
    180 // 3 minutes
}

fn default_refresh_ttl_secs() -> u64 {
    10_800 // 3 hours
}

fn default_store_timeout_ms() -> u64 {
    2_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    /// Base64-encoded HS256 signing secret; rejected at startup if malformed.
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_token_ttl_secs: u64,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
