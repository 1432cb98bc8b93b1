//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LECTIO_*)
//! 2. Unprefixed `PORT`
//! 3. TOML config file (if LECTIO_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LECTIO_*)
/// 2. `PORT`
/// 3. TOML config file (if LECTIO_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Days a cached text stays valid.
    ///
    /// Set via LECTIO_CACHE_EXPIRY_DAYS environment variable.
    #[serde(default = "default_cache_expiry_days")]
    pub cache_expiry_days: u32,

    /// Maximum number of items in one feed.
    ///
    /// Set via LECTIO_MAX_DAYS_TO_GENERATE environment variable.
    #[serde(default = "default_max_days_to_generate")]
    pub max_days_to_generate: usize,

    /// Most chapters a feed URL may ask for in one day.
    ///
    /// Set via LECTIO_MAX_PACE environment variable.
    #[serde(default = "default_max_pace")]
    pub max_pace: u32,

    /// Content version used in cache keys and scrape URLs.
    ///
    /// Set via LECTIO_DEFAULT_VERSION environment variable.
    #[serde(default = "default_version")]
    pub default_version: String,

    /// Path to the SQLite text cache.
    ///
    /// Set via LECTIO_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    ///
    /// Set via LECTIO_PORT or PORT.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the structured (JSON) text API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the markup source used for scraping.
    #[serde(default = "default_scrape_url")]
    pub scrape_url: String,

    /// Per-attempt timeout for the API source, in milliseconds.
    #[serde(default = "default_api_timeout_ms")]
    pub api_timeout_ms: u64,

    /// Per-attempt timeout for the scrape source, in milliseconds.
    #[serde(default = "default_scrape_timeout_ms")]
    pub scrape_timeout_ms: u64,

    /// Pause after every network-originating resolution, in milliseconds.
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Number of units resolved concurrently while prefetching a feed.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// The cache persists itself whenever its size is a multiple of this.
    #[serde(default = "default_cache_save_batch")]
    pub cache_save_batch: usize,

    /// Seconds between background cache flushes.
    #[serde(default = "default_cache_flush_interval_secs")]
    pub cache_flush_interval_secs: u64,

    /// User-Agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Public URL used as the channel link. Falls back to the request host.
    #[serde(default)]
    pub site_url: Option<String>,
}

fn default_cache_expiry_days() -> u32 {
    30
}

fn default_max_days_to_generate() -> usize {
    22
}

fn default_max_pace() -> u32 {
    50
}

fn default_version() -> String {
    "web".into()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./lectio-cache.sqlite")
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_api_url() -> String {
    "https://labs.bible.org/api/".into()
}

fn default_scrape_url() -> String {
    "https://www.biblegateway.com/passage/".into()
}

fn default_api_timeout_ms() -> u64 {
    10_000
}

fn default_scrape_timeout_ms() -> u64 {
    15_000
}

fn default_fetch_delay_ms() -> u64 {
    500
}

fn default_fetch_concurrency() -> usize {
    1
}

fn default_cache_save_batch() -> usize {
    10
}

fn default_cache_flush_interval_secs() -> u64 {
    300
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; lectio-feed/0.1)".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_expiry_days: default_cache_expiry_days(),
            max_days_to_generate: default_max_days_to_generate(),
            max_pace: default_max_pace(),
            default_version: default_version(),
            cache_path: default_cache_path(),
            host: default_host(),
            port: default_port(),
            api_url: default_api_url(),
            scrape_url: default_scrape_url(),
            api_timeout_ms: default_api_timeout_ms(),
            scrape_timeout_ms: default_scrape_timeout_ms(),
            fetch_delay_ms: default_fetch_delay_ms(),
            fetch_concurrency: default_fetch_concurrency(),
            cache_save_batch: default_cache_save_batch(),
            cache_flush_interval_secs: default_cache_flush_interval_secs(),
            user_agent: default_user_agent(),
            site_url: None,
        }
    }
}

impl AppConfig {
    /// Cache entry lifetime.
    pub fn cache_expiry(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.cache_expiry_days))
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_millis(self.scrape_timeout_ms)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn cache_flush_interval(&self) -> Duration {
        Duration::from_secs(self.cache_flush_interval_secs)
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LECTIO_`
    /// 2. `PORT`
    /// 3. TOML file from `LECTIO_CONFIG_FILE` (if set)
    /// 4. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LECTIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(Env::raw().only(&["PORT"]).map(|key| key.as_str().to_lowercase().into()))
            .merge(
                Env::prefixed("LECTIO_")
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
