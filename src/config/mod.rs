//! Configuration loading and management for the payout calculator.
//!
//! This module loads the shop configuration (timezone, day boundaries,
//! default hourly rate, unstaffed tip policy) and the staff roster from YAML
//! files, with environment overrides for the boundaries, timezone and rate.
//!
//! # Example
//!
//! ```no_run
//! use barista_pay::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/barista-pay").unwrap();
//! println!("Loaded shop: {}", loader.config().name());
//! ```

mod loader;
mod types;

pub use loader::{
    CLOSE_TIME_VAR, ConfigLoader, HOURLY_RATE_VAR, OPEN_TIME_VAR, SWITCH_TIME_VAR, TIMEZONE_VAR,
    parse_timezone,
};
pub use types::{
    BoundaryFile, DayBoundaries, ShopConfig, ShopFile, UnstaffedTipPolicy, parse_time_of_day,
};
