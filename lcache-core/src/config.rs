//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLEANUP_INTERVAL_MS, DEFAULT_EXPIRATION_MS, ENV_CLEANUP_INTERVAL_MS,
    ENV_DEFAULT_EXPIRATION_MS,
};
use crate::envelope::Expiration;
use crate::error::ConfigError;

/// Construction-time settings for the underlying expiring store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Expiration for entries stored with the default ttl. 0 = never expire.
    pub default_expiration_ms: u64,
    /// Interval between housekeeping passes. 0 = housekeeping left to the store.
    pub cleanup_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_expiration_ms: DEFAULT_EXPIRATION_MS,
            cleanup_interval_ms: DEFAULT_CLEANUP_INTERVAL_MS,
        }
    }
}

impl CacheConfig {
    /// Creates a config from explicit durations.
    pub fn new(default_expiration: Duration, cleanup_interval: Duration) -> Self {
        Self::default()
            .with_default_expiration(default_expiration)
            .with_cleanup_interval(cleanup_interval)
    }

    /// Reads overrides from `LCACHE_DEFAULT_EXPIRATION_MS` and
    /// `LCACHE_CLEANUP_INTERVAL_MS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            default_expiration_ms: env_millis(ENV_DEFAULT_EXPIRATION_MS)?
                .unwrap_or(defaults.default_expiration_ms),
            cleanup_interval_ms: env_millis(ENV_CLEANUP_INTERVAL_MS)?
                .unwrap_or(defaults.cleanup_interval_ms),
        })
    }

    /// Sets the default expiration.
    pub fn with_default_expiration(mut self, d: Duration) -> Self {
        self.default_expiration_ms = duration_millis(d);
        self
    }

    /// Sets the housekeeping interval.
    pub fn with_cleanup_interval(mut self, d: Duration) -> Self {
        self.cleanup_interval_ms = duration_millis(d);
        self
    }

    /// Store-level default expiration.
    pub fn default_expiration(&self) -> Expiration {
        match self.default_expiration_ms {
            0 => Expiration::Never,
            ms => Expiration::After(Duration::from_millis(ms)),
        }
    }

    /// Housekeeping interval, if enabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        match self.cleanup_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn env_millis(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(
            config.default_expiration(),
            Expiration::After(Duration::from_secs(300))
        );
        assert_eq!(config.cleanup_interval(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_values_disable() {
        let config = CacheConfig::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(config.default_expiration(), Expiration::Never);
        assert_eq!(config.cleanup_interval(), None);
    }

    #[test]
    fn test_builders_keep_millis() {
        let config = CacheConfig::default()
            .with_default_expiration(Duration::from_millis(250))
            .with_cleanup_interval(Duration::from_millis(20));
        assert_eq!(config.default_expiration_ms, 250);
        assert_eq!(config.cleanup_interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"cleanup_interval_ms": 10}"#).unwrap();
        assert_eq!(config.cleanup_interval_ms, 10);
        assert_eq!(config.default_expiration_ms, DEFAULT_EXPIRATION_MS);
    }

    // Only this test touches these variables.
    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_DEFAULT_EXPIRATION_MS, "1500");
        std::env::remove_var(ENV_CLEANUP_INTERVAL_MS);
        let config = CacheConfig::from_env().unwrap();
        assert_eq!(config.default_expiration_ms, 1500);
        assert_eq!(config.cleanup_interval_ms, DEFAULT_CLEANUP_INTERVAL_MS);

        std::env::set_var(ENV_CLEANUP_INTERVAL_MS, "often");
        let err = CacheConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var, .. } if var == ENV_CLEANUP_INTERVAL_MS
        ));

        std::env::remove_var(ENV_DEFAULT_EXPIRATION_MS);
        std::env::remove_var(ENV_CLEANUP_INTERVAL_MS);
    }
}
