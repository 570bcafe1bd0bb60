// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for energy delivery, and
//! for the server that exposes it.

use std::net::SocketAddr;

use serde::Deserialize;

use crate::Error;

/// Default lifetime of a transfer session, in seconds.
pub const DEFAULT_SESSION_WINDOW_SECONDS: i64 = 10 * 60;

/// Default time between two delivery sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 5 * 60;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration options for the transfer calculator and the delivery
/// controller.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// How long an issued token stays valid.  A token presented later than
    /// this after it was issued re-arms the connection instead of moving
    /// energy.
    pub session_window_seconds: i64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            session_window_seconds: DEFAULT_SESSION_WINDOW_SECONDS,
        }
    }
}

impl GridConfig {
    /// Parses a `GridConfig` from a TOML string.  Missing fields take their
    /// default values.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::invalid_parameter(format!("Invalid grid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured values are usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.session_window_seconds <= 0 {
            return Err(Error::invalid_parameter(format!(
                "session_window_seconds must be positive, got {}.",
                self.session_window_seconds
            )));
        }
        Ok(())
    }
}

/// Configuration of the API server, usually read from a TOML file.
///
/// ```toml
/// bind_addr = "0.0.0.0:8080"
/// sweep_interval_seconds = 60
///
/// [grid]
/// session_window_seconds = 300
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Time between two runs of
    /// [`deliver_all`][crate::DeliveryController::deliver_all].
    pub sweep_interval_seconds: u64,
    pub grid: GridConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            grid: GridConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parses a `ServerConfig` from a TOML string.  Missing fields take
    /// their default values.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::invalid_parameter(format!("Invalid server config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured values are usable.
    pub fn validate(&self) -> Result<(), Error> {
        self.socket_addr()?;
        if self.sweep_interval_seconds == 0 {
            return Err(Error::invalid_parameter(
                "sweep_interval_seconds must be positive.",
            ));
        }
        self.grid.validate()
    }

    /// Returns the address to listen on.
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        self.bind_addr.parse().map_err(|e| {
            Error::invalid_parameter(format!("Invalid bind_addr {}: {e}", self.bind_addr))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        assert_eq!(GridConfig::from_toml_str(""), Ok(GridConfig::default()));
        assert_eq!(
            GridConfig::from_toml_str("session_window_seconds = 120").map(|c| c.session_window_seconds),
            Ok(120)
        );
        assert!(GridConfig::from_toml_str("session_window_seconds = 0")
            .is_err_and(|e| e.kind() == crate::ErrorKind::InvalidParameter));
        assert!(GridConfig::from_toml_str("unknown = 1").is_err());
    }

    #[test]
    fn test_server_config() -> Result<(), Error> {
        let config = ServerConfig::from_toml_str("")?;
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.sweep_interval_seconds, 300);
        assert_eq!(config.socket_addr()?.port(), 3000);

        let config = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            sweep_interval_seconds = 60

            [grid]
            session_window_seconds = 300
            "#,
        )?;
        assert_eq!(config.socket_addr()?.to_string(), "0.0.0.0:8080");
        assert_eq!(config.sweep_interval_seconds, 60);
        assert_eq!(config.grid.session_window_seconds, 300);

        assert!(ServerConfig::from_toml_str("bind_addr = \"nowhere\"").is_err());
        assert!(ServerConfig::from_toml_str("sweep_interval_seconds = 0").is_err());
        assert!(ServerConfig::from_toml_str("[grid]\nsession_window_seconds = -1").is_err());

        Ok(())
    }
}
