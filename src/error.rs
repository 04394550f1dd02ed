//! Error types for the payout calculator.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that stops a configuration load or a calculation.
//! Problems with individual calendar events are not errors: those events are
//! skipped and reported inside the payout result instead.

use thiserror::Error;

/// The main error type for the payout calculator.
///
/// # Example
///
/// ```
/// use barista_pay::error::PayError;
///
/// let error = PayError::ConfigNotFound {
///     path: "/missing/shop.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/shop.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The open/switch/close boundaries are not strictly increasing.
    #[error("Invalid day boundaries: {message}")]
    InvalidBoundaries {
        /// A description of the ordering problem.
        message: String,
    },

    /// A time-of-day string could not be parsed.
    #[error("Invalid time of day '{value}': expected HH:MM or HH:MM:SS")]
    InvalidTime {
        /// The rejected value.
        value: String,
    },

    /// The configured timezone is not a known IANA zone.
    #[error("Unknown timezone: {name}")]
    InvalidTimezone {
        /// The rejected zone name.
        name: String,
    },

    /// A calendar timestamp could not be parsed.
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// The rejected value.
        value: String,
    },

    /// Tip input was negative or not expressed in whole cents.
    #[error("Invalid tips: {message}")]
    InvalidTips {
        /// A description of the problem.
        message: String,
    },

    /// An hourly rate was negative.
    #[error("Invalid hourly rate: {message}")]
    InvalidRate {
        /// A description of the problem.
        message: String,
    },

    /// A date range ends before it starts.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// A description of the problem.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return PayError.
pub type PayResult<T> = Result<T, PayError>;
