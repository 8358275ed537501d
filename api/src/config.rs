//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use shared::config::{CurrentDayPolicy, EngineConfig};
use std::net::SocketAddr;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `ADSIGHT_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `ADSIGHT_PORT`: The port to listen on (default: 8080)
/// - `ADSIGHT_TIMEZONE`: IANA time zone used for day bucketing (default: "UTC")
/// - `ADSIGHT_INCLUDE_CURRENT_DAY`: set to "true" to include the
///   still-accumulating day in every window (default: excluded)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// The rollup engine configuration.
    pub engine: EngineConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ADSIGHT_PORT` is set but cannot be parsed as a valid port number
    /// - `ADSIGHT_TIMEZONE` is set but is not a known IANA zone name
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("ADSIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("ADSIGHT_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()?
            .unwrap_or(8080);

        let mut engine = EngineConfig::default();
        if let Ok(zone) = std::env::var("ADSIGHT_TIMEZONE") {
            engine.timezone = zone
                .parse::<Tz>()
                .ok()
                .with_context(|| format!("Unknown time zone '{zone}' in ADSIGHT_TIMEZONE"))?;
        }
        if let Ok(flag) = std::env::var("ADSIGHT_INCLUDE_CURRENT_DAY") {
            if flag.eq_ignore_ascii_case("true") || flag == "1" {
                engine.current_day = CurrentDayPolicy::IncludeToday;
            }
        }

        Ok(Self { host, port, engine })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            engine: EngineConfig::default(),
        }
    }
}
