//! Generator configuration: parsing, defaults and validation.
//!
//! Every field is optional in the TOML file; missing fields take the
//! defaults below, which reproduce the stock fixture shape:
//!
//! ```toml
//! base_price = 220.0
//! max_step = 0.5          # close = open + U(-max_step, max_step)
//! max_wick = 0.2          # wicks extend U(0, max_wick) past the body
//! volume_min = 1000
//! volume_max = 50000
//! session_open = "14:30:00"
//! session_close = "21:00:00"
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]

use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{TradingSession, US_EQUITY_CLOSE_UTC, US_EQUITY_OPEN_UTC};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Shape parameters for the synthetic series.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Price of the first bar's open.
    pub base_price: f64,
    /// Largest absolute open-to-close move per bar.
    pub max_step: f64,
    /// Largest distance a wick extends past the bar body.
    pub max_wick: f64,
    /// Smallest per-bar volume (inclusive).
    pub volume_min: u64,
    /// Largest per-bar volume (inclusive).
    pub volume_max: u64,
    /// Daily session open, UTC.
    pub session_open: NaiveTime,
    /// Daily session close, UTC, exclusive.
    pub session_close: NaiveTime,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_price: 220.0,
            max_step: 0.5,
            max_wick: 0.2,
            volume_min: 1000,
            volume_max: 50_000,
            session_open: US_EQUITY_OPEN_UTC,
            session_close: US_EQUITY_CLOSE_UTC,
        }
    }
}

impl GeneratorConfig {
    /// Check the invariants the generator relies on.
    ///
    /// Errors:
    /// - `base_price` not finite or not positive
    /// - `max_step` / `max_wick` negative, or so large that the draw span
    ///   `[-x, x]` overflows
    /// - `volume_min > volume_max`
    /// - session bounds not on a whole minute
    /// - `session_open >= session_close`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "base_price must be a positive number, got {}",
                self.base_price
            )));
        }
        for (name, value) in [("max_step", self.max_step), ("max_wick", self.max_wick)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
            if !(2.0 * value).is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {}, got {value}",
                    f64::MAX / 2.0
                )));
            }
        }
        if self.volume_min > self.volume_max {
            return Err(ConfigError::Invalid(format!(
                "volume_min ({}) exceeds volume_max ({})",
                self.volume_min, self.volume_max
            )));
        }
        for (name, value) in [
            ("session_open", self.session_open),
            ("session_close", self.session_close),
        ] {
            if value.second() != 0 || value.nanosecond() != 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must fall on a whole minute, got {value}"
                )));
            }
        }
        self.try_session()?;
        Ok(())
    }

    /// Daily trading window described by this config.
    ///
    /// Falls back to the default window if the configured one is empty; call
    /// [`validate`](Self::validate) first to reject such configs instead.
    pub fn session(&self) -> TradingSession {
        self.try_session().unwrap_or_default()
    }

    fn try_session(&self) -> Result<TradingSession, ConfigError> {
        TradingSession::new(self.session_open, self.session_close).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "session_open ({}) must be before session_close ({})",
                self.session_open, self.session_close
            ))
        })
    }
}

/// Parse and validate a config from a TOML string.
pub fn load_config_str(toml_str: &str) -> Result<GeneratorConfig, ConfigError> {
    let cfg: GeneratorConfig = toml::from_str(toml_str)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a config TOML file from disk, parse, and validate it.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<GeneratorConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_str(&text)
}
