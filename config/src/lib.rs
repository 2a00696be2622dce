//! # Configuration
//!
//! Settings for the Beacon feature-flag provider, loaded from environment
//! variables following 12-factor app principles.
//!
//! # Environment Variables
//! - `FLAGS_REDIS_URL`: Redis connection string (default: "redis://localhost:6379")
//! - `FLAGS_UPDATE_CHANNEL`: pub/sub channel carrying invalidation
//!   notifications (default: "feature_flag_updates")
//! - `FLAGS_FETCH_TIMEOUT_MS`: upper bound on a single store fetch, in
//!   milliseconds (default: 5000)

use errors::SettingsError;
use std::env;
use std::time::Duration;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_UPDATE_CHANNEL: &str = "feature_flag_updates";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;

/// Provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagsSettings {
    /// Redis connection string.
    pub redis_url: String,
    /// Pub/sub channel carrying flag-update notifications.
    pub channel: String,
    /// Upper bound on a single store fetch.
    pub fetch_timeout_ms: u64,
}

impl Default for FlagsSettings {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            channel: DEFAULT_UPDATE_CHANNEL.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl FlagsSettings {
    /// Loads settings from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            redis_url: env::var("FLAGS_REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            channel: env::var("FLAGS_UPDATE_CHANNEL")
                .unwrap_or_else(|_| DEFAULT_UPDATE_CHANNEL.to_string()),
            fetch_timeout_ms: parse_env("FLAGS_FETCH_TIMEOUT_MS")?
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.redis_url.is_empty() {
            return Err(SettingsError::InvalidValue {
                setting: "FLAGS_REDIS_URL".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.channel.is_empty() {
            return Err(SettingsError::InvalidValue {
                setting: "FLAGS_UPDATE_CHANNEL".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue {
                setting: "FLAGS_FETCH_TIMEOUT_MS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, SettingsError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map(Some).map_err(|_| SettingsError::InvalidValue {
            setting: name.to_string(),
            reason: format!("could not parse {raw:?}"),
        }),
        Err(_) => Ok(None),
    }
}
