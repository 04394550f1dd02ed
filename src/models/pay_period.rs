//! Pay period models.
//!
//! This module contains the [`PayPeriod`] date range and the
//! [`PeriodPayout`] produced by running the calculator over every day in it.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PayError, PayResult};

use super::{AuditWarning, DayPayout, SkippedEvent};

/// An inclusive range of business days.
///
/// # Example
///
/// ```
/// use barista_pay::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
/// ).unwrap();
///
/// assert_eq!(period.days().count(), 7);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 8).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The first day (inclusive).
    pub start_date: NaiveDate,
    /// The last day (inclusive).
    pub end_date: NaiveDate,
}

/// Longest period accepted, in days.
pub const MAX_PERIOD_DAYS: i64 = 366;

impl PayPeriod {
    /// Creates a period, rejecting one that ends before it starts or spans
    /// more than [`MAX_PERIOD_DAYS`].
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> PayResult<Self> {
        if end_date < start_date {
            return Err(PayError::InvalidPeriod {
                message: format!("end date {} is before start date {}", end_date, start_date),
            });
        }
        let days = (end_date - start_date).num_days() + 1;
        if days > MAX_PERIOD_DAYS {
            return Err(PayError::InvalidPeriod {
                message: format!(
                    "{} to {} spans {} days; at most {} are allowed",
                    start_date, end_date, days, MAX_PERIOD_DAYS
                ),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates over every date in the period.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Number of days in the period.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// A worker's totals over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    /// The worker.
    pub worker_label: String,
    /// Hours attributed to a window.
    pub hours: Decimal,
    /// Base pay.
    pub base_pay: Decimal,
    /// Tip shares.
    pub tips: Decimal,
    /// `base_pay + tips`.
    pub total: Decimal,
    /// Days with morning hours.
    pub opening_shifts: u32,
    /// Days with afternoon hours.
    pub closing_shifts: u32,
}

/// Totals over a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Number of days in the period.
    pub days: i64,
    /// Hours attributed to a window.
    pub hours: Decimal,
    /// Sum of base pay.
    pub total_base: Decimal,
    /// Sum of tip shares.
    pub total_tips: Decimal,
    /// Sum of tips nobody could receive.
    pub total_unallocated: Decimal,
    /// `total_base + total_tips`.
    pub grand_total: Decimal,
}

/// One row of the schedule matrix.
///
/// Cells are `O` (morning), `C` (afternoon) or `O/C`; a `*` marks a window
/// shared with someone else. Workers without hours that day have an empty
/// cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// The date.
    pub date: NaiveDate,
    /// Weekday name, e.g. "Tuesday".
    pub day_of_week: String,
    /// Cell per worker.
    pub cells: BTreeMap<String, String>,
}

/// The result of computing payouts for every day of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPayout {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// The period.
    pub period: PayPeriod,
    /// Per-day results, in date order.
    pub days: Vec<DayPayout>,
    /// Per-worker totals, sorted by name ignoring case.
    pub workers: Vec<WorkerSummary>,
    /// Period totals.
    pub totals: PeriodTotals,
    /// Schedule matrix, one row per day.
    pub schedule: Vec<ScheduleRow>,
    /// Events left out before any day was computed (outside the period).
    pub skipped_events: Vec<SkippedEvent>,
    /// Period-level warnings.
    pub warnings: Vec<AuditWarning>,
}

/// Returns the English weekday name.
pub(crate) fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
