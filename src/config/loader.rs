//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the shop
//! configuration and staff roster from YAML files and applying
//! environment overrides on top.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PayError, PayResult};
use crate::models::Roster;

use super::types::{parse_time_of_day, DayBoundaries, ShopConfig, ShopFile};

/// Environment variable overriding the opening time.
pub const OPEN_TIME_VAR: &str = "OPEN_TIME";
/// Environment variable overriding the switch time.
pub const SWITCH_TIME_VAR: &str = "SWITCH_TIME";
/// Environment variable overriding the closing time.
pub const CLOSE_TIME_VAR: &str = "CLOSE_TIME";
/// Environment variable overriding the shop timezone.
pub const TIMEZONE_VAR: &str = "SHOP_TIMEZONE";
/// Environment variable overriding the default hourly rate.
pub const HOURLY_RATE_VAR: &str = "HOURLY_RATE";

/// Loads and provides access to the shop configuration.
///
/// # Directory Structure
///
/// ```text
/// config/barista-pay/
/// ├── shop.yaml       # Name, timezone, day boundaries, default rate, tip policy
/// └── employees.yaml  # Staff roster with aliases and optional own rates
/// ```
///
/// # Example
///
/// ```no_run
/// use barista_pay::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/barista-pay")?.with_env_overrides()?;
/// println!("Open at {}", loader.config().boundaries().open());
/// # Ok::<(), barista_pay::error::PayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ShopConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or unparseable, if a time
    /// or the timezone is invalid, or if the boundaries are not strictly
    /// increasing.
    pub fn load<P: AsRef<Path>>(path: P) -> PayResult<Self> {
        let path = path.as_ref();

        let shop = Self::load_yaml::<ShopFile>(&path.join("shop.yaml"))?;
        let roster = Self::load_yaml::<Roster>(&path.join("employees.yaml"))?;

        let boundaries = DayBoundaries::parse(
            &shop.boundaries.open,
            &shop.boundaries.switch,
            &shop.boundaries.close,
        )?;
        let timezone = parse_timezone(&shop.timezone)?;

        let config = ShopConfig::new(
            shop.name,
            timezone,
            boundaries,
            shop.default_hourly_rate,
            shop.unstaffed_tips,
            roster,
        )?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: ShopConfig) -> Self {
        Self { config }
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> PayResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides supplied by `lookup` and re-validates.
    ///
    /// Each boundary may be overridden on its own; the resulting triple must
    /// still be strictly increasing.
    pub fn with_overrides<F>(self, lookup: F) -> PayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let current = self.config.boundaries();
        let open = match lookup(OPEN_TIME_VAR) {
            Some(value) => parse_time_of_day(&value)?,
            None => current.open(),
        };
        let switch = match lookup(SWITCH_TIME_VAR) {
            Some(value) => parse_time_of_day(&value)?,
            None => current.switch(),
        };
        let close = match lookup(CLOSE_TIME_VAR) {
            Some(value) => parse_time_of_day(&value)?,
            None => current.close(),
        };

        let mut config = self
            .config
            .with_boundaries(DayBoundaries::new(open, switch, close)?);

        if let Some(name) = lookup(TIMEZONE_VAR) {
            config = config.with_timezone(parse_timezone(&name)?);
        }

        if let Some(rate) = lookup(HOURLY_RATE_VAR) {
            let rate = Decimal::from_str(rate.trim()).map_err(|e| PayError::InvalidRate {
                message: format!("{}='{}': {}", HOURLY_RATE_VAR, rate, e),
            })?;
            config = config.with_default_hourly_rate(rate)?;
        }

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying shop configuration.
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }
}

/// Parses an IANA timezone name.
pub fn parse_timezone(name: &str) -> PayResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| PayError::InvalidTimezone {
            name: name.to_string(),
        })
}
