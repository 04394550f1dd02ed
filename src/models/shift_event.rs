//! Shift event models.
//!
//! A [`ShiftEvent`] is one calendar entry for one worker, already converted
//! to the shop's local time. [`CalendarEvent`] is the raw shape a calendar
//! export delivers (string timestamps, a title, attendee emails) before it is
//! resolved against the roster.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayError, PayResult};

/// One worker's calendar entry for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEvent {
    /// Identifier of the calendar event this came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local start time.
    pub start: NaiveDateTime,
    /// Local end time.
    pub end: NaiveDateTime,
    /// The worker this entry belongs to.
    pub worker_label: String,
}

impl ShiftEvent {
    /// Creates an event without a calendar id.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, worker_label: impl Into<String>) -> Self {
        Self {
            id: None,
            start,
            end,
            worker_label: worker_label.into(),
        }
    }

    /// Returns the duration in hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use barista_pay::models::ShiftEvent;
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let event = ShiftEvent::new(
    ///     NaiveDateTime::parse_from_str("2026-02-03 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     NaiveDateTime::parse_from_str("2026-02-03 14:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     "Kat",
    /// );
    /// assert_eq!(event.hours(), Decimal::new(65, 1)); // 6.5 hours
    /// ```
    pub fn hours(&self) -> Decimal {
        hours_between(self.start, self.end)
    }

    /// Returns the date the event is attributed to (the date it starts on).
    pub fn business_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Checks the event is usable, returning why it is not otherwise.
    pub fn validate(&self) -> Result<(), SkipReason> {
        if self.worker_label.trim().is_empty() {
            return Err(SkipReason::MissingWorkerLabel);
        }
        if self.end < self.start {
            return Err(SkipReason::NegativeDuration);
        }
        // Hours are counted in whole minutes
        if (self.end - self.start).num_minutes() == 0 {
            return Err(SkipReason::ZeroDuration);
        }
        Ok(())
    }
}

/// Why an event was left out of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Start and end are less than a minute apart.
    ZeroDuration,
    /// End is before start.
    NegativeDuration,
    /// No worker label and nothing to match against.
    MissingWorkerLabel,
    /// A title was present but nobody on the roster matched it.
    UnknownWorker,
    /// A timestamp could not be parsed.
    InvalidTimestamp,
    /// The event starts outside the requested date range.
    OutsidePeriod,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ZeroDuration => write!(f, "event is shorter than a minute"),
            SkipReason::NegativeDuration => write!(f, "event ends before it starts"),
            SkipReason::MissingWorkerLabel => write!(f, "event has no worker label"),
            SkipReason::UnknownWorker => write!(f, "no roster employee matches the event"),
            SkipReason::InvalidTimestamp => write!(f, "event timestamp could not be parsed"),
            SkipReason::OutsidePeriod => write!(f, "event starts outside the requested period"),
        }
    }
}

/// An event that was not used, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEvent {
    /// Calendar id of the event, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Worker label or event title, whichever was available.
    pub worker_label: String,
    /// Raw or local start, as text.
    pub start: String,
    /// Raw or local end, as text.
    pub end: String,
    /// Why the event was skipped.
    pub reason: SkipReason,
}

impl SkippedEvent {
    /// Records a parsed event that failed validation or range checks.
    pub fn from_event(event: &ShiftEvent, reason: SkipReason) -> Self {
        Self {
            event_id: event.id.clone(),
            worker_label: event.worker_label.clone(),
            start: event.start.to_string(),
            end: event.end.to_string(),
            reason,
        }
    }
}

/// A calendar entry as exported by the calendar service.
///
/// Either `worker_label` names the worker directly, or `summary` and
/// `attendees` are matched against the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Calendar event id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event title.
    #[serde(default)]
    pub summary: String,
    /// RFC 3339 timestamp, naive local timestamp, or all-day date.
    pub start: String,
    /// RFC 3339 timestamp, naive local timestamp, or all-day date.
    pub end: String,
    /// Attendee email addresses.
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Explicit worker label, bypassing roster matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_label: Option<String>,
}

/// Parses a calendar timestamp into shop-local time.
///
/// Accepts RFC 3339 with an offset or `Z` (converted into `tz`), a naive
/// `YYYY-MM-DDTHH:MM[:SS]` (already local), or an all-day `YYYY-MM-DD`
/// (local midnight).
///
/// # Examples
///
/// ```
/// use barista_pay::models::parse_event_time;
///
/// let tz = chrono_tz::America::Chicago;
/// let local = parse_event_time("2026-02-03T14:00:00Z", tz).unwrap();
/// assert_eq!(local.to_string(), "2026-02-03 08:00:00");
///
/// let all_day = parse_event_time("2026-02-03", tz).unwrap();
/// assert_eq!(all_day.to_string(), "2026-02-03 00:00:00");
/// ```
pub fn parse_event_time(raw: &str, tz: Tz) -> PayResult<NaiveDateTime> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&tz).naive_local());
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| PayError::InvalidTimestamp {
            value: raw.to_string(),
        })
}

/// Calculates the number of hours between two datetimes, at minute precision.
pub(crate) fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    let duration_minutes = (end - start).num_minutes();
    Decimal::new(duration_minutes, 0) / Decimal::new(60, 0)
}
