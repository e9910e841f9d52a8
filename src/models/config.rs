//! Configuration for the appraisal engine
//!
//! Defaults live in `utils/constants.rs`; every value can be overridden from
//! the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_HISTORY_CAPACITY, DEFAULT_PROVIDER_TIMEOUT_MS,
    DEFAULT_SWEEP_INTERVAL_SECS,
};

/// Runtime configuration for the estimator and its collaborators
#[derive(Debug, Clone)]
pub struct AppraiserConfig {
    /// How long an aggregated signal bundle stays valid
    pub cache_ttl: Duration,
    /// How often the background sweep drops expired cache entries
    pub sweep_interval: Duration,
    /// Deadline for a single signal provider call
    pub provider_timeout: Duration,
    /// Optional JSON rule table; the embedded table is used when absent
    pub rules_path: Option<PathBuf>,
    /// Maximum number of history records kept in memory
    pub history_capacity: usize,
}

impl Default for AppraiserConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(env_or("APPRAISER_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)),
            sweep_interval: Duration::from_secs(env_or(
                "APPRAISER_SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )),
            provider_timeout: Duration::from_millis(env_or(
                "APPRAISER_PROVIDER_TIMEOUT_MS",
                DEFAULT_PROVIDER_TIMEOUT_MS,
            )),
            rules_path: std::env::var("APPRAISER_RULES_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            history_capacity: env_or("APPRAISER_HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl AppraiserConfig {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.sweep_interval.is_zero() {
            return Err(AppError::invalid_config(
                "APPRAISER_SWEEP_INTERVAL_SECS must be at least 1",
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(AppError::invalid_config(
                "APPRAISER_PROVIDER_TIMEOUT_MS must be at least 1",
            ));
        }
        if self.history_capacity == 0 {
            return Err(AppError::invalid_config(
                "APPRAISER_HISTORY_CAPACITY must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Read `key` from the environment, falling back to `default` when unset or
/// unparseable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("⚠️ Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u64 = env_or("APPRAISER_TEST_SURELY_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = AppraiserConfig::default()
            .with_cache_ttl(Duration::from_secs(1))
            .with_provider_timeout(Duration::from_millis(250));
        assert_eq!(config.cache_ttl, Duration::from_secs(1));
        assert_eq!(config.provider_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let base = AppraiserConfig::default()
            .with_sweep_interval(Duration::from_secs(60))
            .with_provider_timeout(Duration::from_secs(5));
        let base = AppraiserConfig {
            history_capacity: 10,
            ..base
        };
        assert!(base.validate().is_ok());

        let err = base
            .clone()
            .with_sweep_interval(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ConfigInvalidValue);
        assert!(err.message.contains("SWEEP_INTERVAL"));

        let err = base
            .clone()
            .with_provider_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ConfigInvalidValue);

        let zero_history = AppraiserConfig {
            history_capacity: 0,
            ..base
        };
        assert!(zero_history.validate().is_err());
    }
}
