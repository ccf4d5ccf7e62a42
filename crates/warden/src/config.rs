//! Environment-driven configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use warden_error::{ConfigError, WardenResult};

/// Default catalog API root.
const DEFAULT_CATALOG_BASE_URL: &str = "https://api.peterportal.org/rest/v0";

/// Default pagination timeout in seconds.
const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration for the Warden process.
///
/// Everything comes from the environment (optionally via a `.env` file);
/// the database connection string is read separately by the database
/// layer from `DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Discord bot token
    pub discord_token: String,
    /// Root URL of the course catalog API
    pub catalog_base_url: String,
    /// Seconds before an interactive result page expires
    pub page_timeout_secs: u64,
}

impl WardenConfig {
    /// Read the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `DISCORD_TOKEN` is unset, or when
    /// `WARDEN_PAGE_TIMEOUT_SECS` is set but not an integer.
    pub fn from_env() -> WardenResult<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| ConfigError::new("DISCORD_TOKEN environment variable not set"))?;

        let catalog_base_url = std::env::var("WARDEN_CATALOG_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_string());

        let page_timeout_secs = match std::env::var("WARDEN_PAGE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ConfigError::new(format!(
                    "WARDEN_PAGE_TIMEOUT_SECS must be an integer, got: {raw}"
                ))
            })?,
            Err(_) => DEFAULT_PAGE_TIMEOUT_SECS,
        };

        Ok(Self {
            discord_token,
            catalog_base_url,
            page_timeout_secs,
        })
    }

    /// The pagination timeout as a duration.
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}
