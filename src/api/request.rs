//! Request types for the payout API.
//!
//! Events arrive in calendar form ([`CalendarEvent`]) and are resolved
//! against the roster by the handlers before any calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PayResult;
use crate::models::{CalendarEvent, PayPeriod, TipInput};

/// Request body for `POST /payouts/day`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPayoutRequest {
    /// The business day.
    pub date: NaiveDate,
    /// Calendar entries for the day.
    pub events: Vec<CalendarEvent>,
    /// Replaces the configured default hourly rate for this request.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// The day's card tips. No tips when omitted.
    #[serde(default)]
    pub tips: TipInput,
}

/// Request body for `POST /payouts/period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodPayoutRequest {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Calendar entries for the period.
    pub events: Vec<CalendarEvent>,
    /// Replaces the configured default hourly rate for this request.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Tips per day.
    #[serde(default)]
    pub daily_tips: BTreeMap<NaiveDate, TipInput>,
    /// Text of a card-terminal tip report. Dates it covers are used unless
    /// `daily_tips` has an entry for the same date.
    #[serde(default)]
    pub tip_payload: Option<String>,
}

impl PeriodPayoutRequest {
    /// Returns the validated period.
    pub fn period(&self) -> PayResult<PayPeriod> {
        PayPeriod::new(self.start_date, self.end_date)
    }
}

/// Request body for `POST /tips/parse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipParseRequest {
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// The report text.
    pub text: String,
}

impl TipParseRequest {
    /// Returns the validated range.
    pub fn period(&self) -> PayResult<PayPeriod> {
        PayPeriod::new(self.start_date, self.end_date)
    }
}
