//! Application configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::lookup::LookupCacheConfig;
use crate::store::{ExitPolicy, InvalidExitPolicy, RouteStoreConfig};

/// Path of the persisted route list.
pub const ROUTES_PATH_VAR: &str = "TRAVEL_ROUTES_PATH";
/// `retain` or `clear`.
pub const ON_EXIT_VAR: &str = "TRAVEL_ON_EXIT";
pub const WEATHER_KEY_VAR: &str = "WEATHER_API_KEY";
pub const FLIGHT_KEY_VAR: &str = "FLIGHT_API_KEY";
pub const LOOKUP_TTL_VAR: &str = "TRAVEL_LOOKUP_TTL_SECS";
pub const LOOKUP_CAPACITY_VAR: &str = "TRAVEL_LOOKUP_CAPACITY";

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    ExitPolicy {
        var: &'static str,
        source: InvalidExitPolicy,
    },

    #[error("{var}: expected a non-negative integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Where routes are persisted and what happens to them on exit.
    pub store: RouteStoreConfig,

    /// Key for the weather service. Weather lookups are disabled without it.
    pub weather_api_key: Option<String>,

    /// Key for the flight service. Flight lookups are disabled without it.
    pub flight_api_key: Option<String>,

    /// Cache applied to both lookup services.
    pub lookup_cache: LookupCacheConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Unset and blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ROUTES_PATH_VAR) {
            config.store.path = PathBuf::from(path);
        }

        if let Some(policy) = get(ON_EXIT_VAR) {
            config.store.on_exit = policy
                .parse::<ExitPolicy>()
                .map_err(|source| ConfigError::ExitPolicy {
                    var: ON_EXIT_VAR,
                    source,
                })?;
        }

        config.weather_api_key = get(WEATHER_KEY_VAR);
        config.flight_api_key = get(FLIGHT_KEY_VAR);

        if let Some(secs) = get(LOOKUP_TTL_VAR) {
            config.lookup_cache.ttl = Duration::from_secs(parse_number(LOOKUP_TTL_VAR, &secs)?);
        }

        if let Some(capacity) = get(LOOKUP_CAPACITY_VAR) {
            config.lookup_cache.max_capacity = parse_number(LOOKUP_CAPACITY_VAR, &capacity)?;
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber {
            var,
            value: value.to_string(),
        })
}
