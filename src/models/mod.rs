//! Core data models for the payout calculator.
//!
//! This module contains all the domain models used throughout the crate.

mod audit;
mod employee;
mod pay_period;
mod payout;
mod shift_event;
mod tips;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{Employee, Roster};
pub use pay_period::{
    MAX_PERIOD_DAYS, PayPeriod, PeriodPayout, PeriodTotals, ScheduleRow, WorkerSummary,
};
pub(crate) use pay_period::weekday_name;
pub use payout::{DayPayout, DayTotals, PayoutResult, ShiftWindow, UnallocatedTips};
pub(crate) use shift_event::hours_between;
pub use shift_event::{CalendarEvent, ShiftEvent, SkipReason, SkippedEvent, parse_event_time};
pub use tips::TipInput;
