//! Harvest configuration
//!
//! Defaults match a polite crawl of pokemondb.net. Environment variables
//! (optionally from a `.env` file) override the defaults and CLI flags
//! override the environment.

use crate::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

// ============================================================================
// Harvest Configuration Constants
// ============================================================================

/// Site root all relative links are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://pokemondb.net";

/// Path of the listing page on the site.
pub const DEFAULT_LISTING_PATH: &str = "/pokedex/all";

/// Where the final document is written.
pub const DEFAULT_OUTPUT_PATH: &str = "pokemons_final.json";

/// Where the stubs-only listing document is written.
pub const DEFAULT_LISTING_OUTPUT_PATH: &str = "pokemons.json";

/// Maximum number of requests in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Pause before each request, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Additional attempts after a retryable failure.
pub const DEFAULT_RETRIES: u32 = 3;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "dex-harvest/0.1";

/// Description used when no paragraph on a sub-resource page qualifies.
pub const DEFAULT_MISSING_DESCRIPTION: &str = "Description not available";

/// Harvest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub base_url: Url,
    pub listing_path: String,
    pub output_path: PathBuf,
    pub concurrency: usize,
    pub delay_ms: u64,
    pub retries: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub missing_description: String,
    /// Collapse sub-resources sharing a name within one entry (first wins)
    pub collapse_duplicate_sub_resources: bool,
    /// Dispatch at most this many stubs (None for all)
    pub limit: Option<usize>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            concurrency: DEFAULT_CONCURRENCY,
            delay_ms: DEFAULT_DELAY_MS,
            retries: DEFAULT_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            missing_description: DEFAULT_MISSING_DESCRIPTION.to_string(),
            collapse_duplicate_sub_resources: false,
            limit: None,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

impl HarvestConfig {
    /// Load configuration from environment and defaults
    ///
    /// Environment variables:
    /// - `DEX_BASE_URL`, `DEX_LISTING_PATH`, `DEX_OUTPUT`
    /// - `DEX_CONCURRENCY`, `DEX_DELAY_MS`, `DEX_RETRIES`, `DEX_TIMEOUT_SECS`
    /// - `DEX_USER_AGENT`, `DEX_COLLAPSE_DUPLICATES`, `DEX_LIMIT`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("DEX_BASE_URL") {
            config.base_url = Url::parse(&url)?;
        }
        if let Ok(path) = std::env::var("DEX_LISTING_PATH") {
            config.listing_path = path;
        }
        if let Ok(output) = std::env::var("DEX_OUTPUT") {
            config.output_path = PathBuf::from(output);
        }
        if let Some(concurrency) = env_parse("DEX_CONCURRENCY")? {
            config.concurrency = concurrency;
        }
        if let Some(delay) = env_parse("DEX_DELAY_MS")? {
            config.delay_ms = delay;
        }
        if let Some(retries) = env_parse("DEX_RETRIES")? {
            config.retries = retries;
        }
        if let Some(timeout) = env_parse("DEX_TIMEOUT_SECS")? {
            config.timeout_secs = timeout;
        }
        if let Ok(agent) = std::env::var("DEX_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(collapse) = env_parse("DEX_COLLAPSE_DUPLICATES")? {
            config.collapse_duplicate_sub_resources = collapse;
        }
        if let Some(limit) = env_parse("DEX_LIMIT")? {
            config.limit = Some(limit);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_collapse_duplicates(mut self, collapse: bool) -> Self {
        self.collapse_duplicate_sub_resources = collapse;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(HarvestError::config("concurrency must be at least 1"));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(HarvestError::config(format!(
                "base URL '{}' cannot be used to resolve links",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Absolute URL of the listing page
    pub fn listing_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.listing_path)?)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| HarvestError::config(format!("{}='{}': {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarvestConfig::default();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.retries, 3);
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert_eq!(config.output_path, PathBuf::from("pokemons_final.json"));
        assert!(!config.collapse_duplicate_sub_resources);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listing_url() {
        let config = HarvestConfig::default();
        assert_eq!(
            config.listing_url().unwrap().as_str(),
            "https://pokemondb.net/pokedex/all"
        );

        let local = config.with_base_url(Url::parse("http://127.0.0.1:9000").unwrap());
        assert_eq!(
            local.listing_url().unwrap().as_str(),
            "http://127.0.0.1:9000/pokedex/all"
        );
    }

    #[test]
    fn test_collapse_duplicates_builder() {
        let config = HarvestConfig::default().with_collapse_duplicates(true);
        assert!(config.collapse_duplicate_sub_resources);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = HarvestConfig::default().with_concurrency(0);
        assert!(matches!(config.validate(), Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_non_base_url_rejected() {
        let config =
            HarvestConfig::default().with_base_url(Url::parse("mailto:dex@example.com").unwrap());
        assert!(config.validate().is_err());
    }
}
