//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::plan::MAX_DAILY_CHAPTERS;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_expiry_days` is 0
    /// - `max_days_to_generate` is 0 or exceeds a year
    /// - `max_pace` is 0 or exceeds the whole catalog
    /// - either fetch timeout is below 100ms or above 5 minutes
    /// - `fetch_delay_ms` exceeds 10 seconds
    /// - `fetch_concurrency` is outside 1..=16
    /// - `cache_save_batch` or `cache_flush_interval_secs` is 0
    /// - `user_agent` or `default_version` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_expiry_days == 0 {
            return Err(invalid("cache_expiry_days", "must be at least 1"));
        }

        if self.max_days_to_generate == 0 {
            return Err(invalid("max_days_to_generate", "must be greater than 0"));
        }
        if self.max_days_to_generate > 366 {
            return Err(invalid("max_days_to_generate", "must not exceed 366"));
        }

        if self.max_pace == 0 || self.max_pace > MAX_DAILY_CHAPTERS {
            return Err(invalid("max_pace", "must be between 1 and 1189"));
        }

        for (field, value) in [("api_timeout_ms", self.api_timeout_ms), ("scrape_timeout_ms", self.scrape_timeout_ms)] {
            if value < 100 {
                return Err(invalid(field, "must be at least 100ms"));
            }
            if value > 300_000 {
                return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
            }
        }

        if self.fetch_delay_ms > 10_000 {
            return Err(invalid("fetch_delay_ms", "must not exceed 10 seconds"));
        }

        if self.fetch_concurrency == 0 || self.fetch_concurrency > 16 {
            return Err(invalid("fetch_concurrency", "must be between 1 and 16"));
        }

        if self.cache_save_batch == 0 {
            return Err(invalid("cache_save_batch", "must be greater than 0"));
        }

        if self.cache_flush_interval_secs == 0 {
            return Err(invalid("cache_flush_interval_secs", "must be at least 1 second"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.default_version.trim().is_empty() {
            return Err(invalid("default_version", "must not be empty"));
        }

        if self.fetch_concurrency > 1 && self.fetch_delay_ms == 0 {
            tracing::warn!(
                fetch_concurrency = self.fetch_concurrency,
                "concurrent prefetch without a fetch delay may hammer upstream sources"
            );
        }

        Ok(())
    }
}
