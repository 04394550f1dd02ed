//! Configuration types for the payout calculator.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files, plus the validated forms the
//! calculator is constructed from.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{PayRates, PayoutCalculator};
use crate::error::{PayError, PayResult};
use crate::models::{Roster, ShiftWindow};

/// Parses a time of day written as `HH:MM` or `HH:MM:SS`.
///
/// # Example
///
/// ```
/// use barista_pay::config::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time_of_day("08:00").unwrap(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
/// assert!(parse_time_of_day("8 o'clock").is_err());
/// ```
pub fn parse_time_of_day(value: &str) -> PayResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| PayError::InvalidTime {
            value: value.to_string(),
        })
}

/// The three times of day that split a business day into two shift windows.
///
/// The morning window is `[open, switch)` and the afternoon window is
/// `[switch, close)`. The only way to build a value is through
/// [`DayBoundaries::new`] or [`DayBoundaries::parse`], both of which reject
/// boundaries that are not strictly increasing.
///
/// # Example
///
/// ```
/// use barista_pay::config::DayBoundaries;
///
/// let boundaries = DayBoundaries::parse("08:00", "14:00", "21:00").unwrap();
/// assert_eq!(boundaries.open().to_string(), "08:00:00");
///
/// // A switch before opening is rejected.
/// assert!(DayBoundaries::parse("08:00", "07:00", "21:00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBoundaries {
    open: NaiveTime,
    switch: NaiveTime,
    close: NaiveTime,
}

impl DayBoundaries {
    /// Creates validated boundaries.
    ///
    /// Returns `InvalidBoundaries` unless `open < switch < close`.
    pub fn new(open: NaiveTime, switch: NaiveTime, close: NaiveTime) -> PayResult<Self> {
        if switch <= open {
            return Err(PayError::InvalidBoundaries {
                message: format!(
                    "switch time {} must be after open time {}",
                    switch.format("%H:%M"),
                    open.format("%H:%M")
                ),
            });
        }
        if close <= switch {
            return Err(PayError::InvalidBoundaries {
                message: format!(
                    "close time {} must be after switch time {}",
                    close.format("%H:%M"),
                    switch.format("%H:%M")
                ),
            });
        }
        Ok(Self {
            open,
            switch,
            close,
        })
    }

    /// Parses and validates boundaries from `HH:MM` strings.
    pub fn parse(open: &str, switch: &str, close: &str) -> PayResult<Self> {
        Self::new(
            parse_time_of_day(open)?,
            parse_time_of_day(switch)?,
            parse_time_of_day(close)?,
        )
    }

    /// Returns the opening time.
    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Returns the time the morning window hands over to the afternoon window.
    pub fn switch(&self) -> NaiveTime {
        self.switch
    }

    /// Returns the closing time.
    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Returns the `[start, end)` instants of a window on the given date.
    pub fn window_bounds(
        &self,
        date: NaiveDate,
        window: ShiftWindow,
    ) -> (NaiveDateTime, NaiveDateTime) {
        match window {
            ShiftWindow::Morning => (date.and_time(self.open), date.and_time(self.switch)),
            ShiftWindow::Afternoon => (date.and_time(self.switch), date.and_time(self.close)),
        }
    }
}

/// What happens to a window's tip pool when nobody worked that window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnstaffedTipPolicy {
    /// An unstaffed morning pool is added to the afternoon pool of the same
    /// day. Whatever still has no recipients is reported as unallocated.
    #[default]
    CarryForward,
    /// Every unstaffed pool is reported as unallocated.
    Unallocated,
}

/// Boundary strings as written in `shop.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryFile {
    /// Opening time, `HH:MM`.
    pub open: String,
    /// Morning to afternoon handover, `HH:MM`.
    pub switch: String,
    /// Closing time, `HH:MM`.
    pub close: String,
}

/// The `shop.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopFile {
    /// Display name of the shop.
    pub name: String,
    /// IANA timezone calendar timestamps are converted into.
    pub timezone: String,
    /// Day boundaries.
    pub boundaries: BoundaryFile,
    /// Hourly rate used for workers without their own rate.
    pub default_hourly_rate: Decimal,
    /// Policy for tips of unstaffed windows.
    #[serde(default)]
    pub unstaffed_tips: UnstaffedTipPolicy,
}

/// The complete, validated shop configuration.
///
/// This is the explicit configuration object that replaces ambient
/// environment lookups: the calculator and the API only ever read from it.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    name: String,
    timezone: Tz,
    boundaries: DayBoundaries,
    default_hourly_rate: Decimal,
    unstaffed_tips: UnstaffedTipPolicy,
    roster: Roster,
}

impl ShopConfig {
    /// Creates a new ShopConfig from its component parts.
    ///
    /// Returns `InvalidRate` if the default hourly rate is negative.
    pub fn new(
        name: String,
        timezone: Tz,
        boundaries: DayBoundaries,
        default_hourly_rate: Decimal,
        unstaffed_tips: UnstaffedTipPolicy,
        roster: Roster,
    ) -> PayResult<Self> {
        if default_hourly_rate < Decimal::ZERO {
            return Err(PayError::InvalidRate {
                message: format!("default hourly rate {} is negative", default_hourly_rate),
            });
        }
        Ok(Self {
            name,
            timezone,
            boundaries,
            default_hourly_rate,
            unstaffed_tips,
            roster,
        })
    }

    /// Returns the shop name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shop timezone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the validated day boundaries.
    pub fn boundaries(&self) -> DayBoundaries {
        self.boundaries
    }

    /// Returns the default hourly rate.
    pub fn default_hourly_rate(&self) -> Decimal {
        self.default_hourly_rate
    }

    /// Returns the unstaffed tip policy.
    pub fn unstaffed_tips(&self) -> UnstaffedTipPolicy {
        self.unstaffed_tips
    }

    /// Returns the staff roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Builds a calculator bound to this configuration.
    pub fn calculator(&self) -> PayoutCalculator {
        PayoutCalculator::new(self.boundaries, self.unstaffed_tips)
    }

    /// Builds the rate table for a calculation.
    ///
    /// `default_override` replaces the configured default rate (a request may
    /// supply its own); per-employee roster rates always take precedence.
    pub fn pay_rates(&self, default_override: Option<Decimal>) -> PayResult<PayRates> {
        let default = default_override.unwrap_or(self.default_hourly_rate);
        PayRates::new(default, self.roster.rate_overrides())
    }

    pub(crate) fn with_boundaries(mut self, boundaries: DayBoundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub(crate) fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub(crate) fn with_default_hourly_rate(mut self, rate: Decimal) -> PayResult<Self> {
        if rate < Decimal::ZERO {
            return Err(PayError::InvalidRate {
                message: format!("default hourly rate {} is negative", rate),
            });
        }
        self.default_hourly_rate = rate;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_of_day_accepts_minutes_and_seconds() {
        assert_eq!(parse_time_of_day("08:00").unwrap(), time(8, 0));
        assert_eq!(parse_time_of_day("14:30:00").unwrap(), time(14, 30));
        assert_eq!(parse_time_of_day(" 21:00 ").unwrap(), time(21, 0));
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        match parse_time_of_day("25:00") {
            Err(PayError::InvalidTime { value }) => assert_eq!(value, "25:00"),
            other => panic!("Expected InvalidTime, got {:?}", other),
        }
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn test_valid_boundaries() {
        let boundaries = DayBoundaries::new(time(8, 0), time(14, 0), time(21, 0)).unwrap();
        assert_eq!(boundaries.open(), time(8, 0));
        assert_eq!(boundaries.switch(), time(14, 0));
        assert_eq!(boundaries.close(), time(21, 0));
    }

    #[test]
    fn test_switch_before_open_rejected() {
        let result = DayBoundaries::new(time(8, 0), time(7, 0), time(21, 0));
        match result {
            Err(PayError::InvalidBoundaries { message }) => {
                assert!(message.contains("switch time 07:00"));
            }
            other => panic!("Expected InvalidBoundaries, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_boundaries_rejected() {
        assert!(DayBoundaries::new(time(8, 0), time(8, 0), time(21, 0)).is_err());
        assert!(DayBoundaries::new(time(8, 0), time(14, 0), time(14, 0)).is_err());
    }

    #[test]
    fn test_close_before_switch_rejected() {
        match DayBoundaries::parse("08:00", "14:00", "13:00") {
            Err(PayError::InvalidBoundaries { message }) => {
                assert!(message.contains("close time 13:00"));
            }
            other => panic!("Expected InvalidBoundaries, got {:?}", other),
        }
    }

    #[test]
    fn test_window_bounds() {
        let boundaries = DayBoundaries::parse("08:00", "14:00", "21:00").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();

        let (start, end) = boundaries.window_bounds(date, ShiftWindow::Morning);
        assert_eq!(start, date.and_time(time(8, 0)));
        assert_eq!(end, date.and_time(time(14, 0)));

        let (start, end) = boundaries.window_bounds(date, ShiftWindow::Afternoon);
        assert_eq!(start, date.and_time(time(14, 0)));
        assert_eq!(end, date.and_time(time(21, 0)));
    }

    #[test]
    fn test_unstaffed_policy_deserializes_snake_case() {
        let policy: UnstaffedTipPolicy = serde_yaml::from_str("carry_forward").unwrap();
        assert_eq!(policy, UnstaffedTipPolicy::CarryForward);
        let policy: UnstaffedTipPolicy = serde_yaml::from_str("unallocated").unwrap();
        assert_eq!(policy, UnstaffedTipPolicy::Unallocated);
        assert_eq!(UnstaffedTipPolicy::default(), UnstaffedTipPolicy::CarryForward);
    }

    #[test]
    fn test_shop_config_rejects_negative_rate() {
        let result = ShopConfig::new(
            "Test".to_string(),
            chrono_tz::America::Chicago,
            DayBoundaries::parse("08:00", "14:00", "21:00").unwrap(),
            Decimal::new(-1, 0),
            UnstaffedTipPolicy::CarryForward,
            Roster::default(),
        );
        assert!(matches!(result, Err(PayError::InvalidRate { .. })));
    }
}
