//! Process configuration.
//!
//! Read once at startup from the environment and handed to the components
//! that need it. Nothing below this module looks at the environment.

use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::cache::CacheConfig;
use crate::places::PlacesConfig;
use crate::shortcode::ShortcodeConfig;

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const PLACE_ID_VAR: &str = "GOOGLE_PLACE_ID";
pub const TIMEZONE_VAR: &str = "OPENING_HOURS_TIMEZONE";
pub const CACHE_TTL_VAR: &str = "OPENING_HOURS_CACHE_TTL_SECS";
pub const SITE_URL_VAR: &str = "OPENING_HOURS_SITE_URL";
pub const BIND_VAR: &str = "OPENING_HOURS_BIND";

const DEFAULT_SITE_URL: &str = "http://localhost:3000/";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: unknown timezone {value:?}")]
    Timezone { var: &'static str, value: String },

    #[error("{var}: expected a whole number of seconds, got {value:?}")]
    CacheTtl { var: &'static str, value: String },

    #[error("{var}: expected a socket address such as 127.0.0.1:3000, got {value:?}")]
    Bind { var: &'static str, value: String },
}

/// Configuration for the whole service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Places API key. May be empty, in which case every fetch fails.
    pub api_key: String,
    /// Place shown when a request doesn't name one. May be empty.
    pub default_place_id: String,
    /// Zone used for "today" and the calendar dates.
    pub timezone: Tz,
    /// How long fetched hours are cached.
    pub cache_ttl: Duration,
    /// Public URL of the site, reported in the user agent.
    pub site_url: String,
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timezone = match get(TIMEZONE_VAR) {
            Some(value) => value.parse::<Tz>().map_err(|_| ConfigError::Timezone {
                var: TIMEZONE_VAR,
                value,
            })?,
            None => Tz::UTC,
        };

        let cache_ttl = match get(CACHE_TTL_VAR) {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::CacheTtl {
                    var: CACHE_TTL_VAR,
                    value,
                })?,
            None => CacheConfig::default().ttl,
        };

        let bind = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Bind {
                var: BIND_VAR,
                value: bind,
            })?;

        Ok(Self {
            api_key: get(API_KEY_VAR).unwrap_or_default(),
            default_place_id: get(PLACE_ID_VAR).unwrap_or_default(),
            timezone,
            cache_ttl,
            site_url: get(SITE_URL_VAR).unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            bind_addr,
        })
    }

    /// Places client settings.
    pub fn places_config(&self) -> PlacesConfig {
        PlacesConfig::new(&self.api_key).with_site_url(&self.site_url)
    }

    /// Cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_ttl(self.cache_ttl)
    }

    /// Shortcode handler settings.
    pub fn shortcode_config(&self) -> ShortcodeConfig {
        ShortcodeConfig {
            default_place_id: self.default_place_id.clone(),
            timezone: self.timezone,
        }
    }
}
