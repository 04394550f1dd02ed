//! Payout result models.
//!
//! This module contains the [`DayPayout`] type and its associated structures
//! that capture everything produced for one business day: per-worker,
//! per-window payout lines, totals, tips nobody could receive, skipped
//! events, and an audit trace.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, SkippedEvent};

/// A portion of the business day.
///
/// # Example
///
/// ```
/// use barista_pay::models::ShiftWindow;
///
/// assert_eq!(ShiftWindow::Morning.to_string(), "morning");
/// assert_eq!(ShiftWindow::ALL, [ShiftWindow::Morning, ShiftWindow::Afternoon]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftWindow {
    /// From opening until the switch time.
    Morning,
    /// From the switch time until closing.
    Afternoon,
}

impl ShiftWindow {
    /// Both windows in chronological order.
    pub const ALL: [ShiftWindow; 2] = [ShiftWindow::Morning, ShiftWindow::Afternoon];
}

impl std::fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftWindow::Morning => write!(f, "morning"),
            ShiftWindow::Afternoon => write!(f, "afternoon"),
        }
    }
}

/// What one worker earned in one window of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutResult {
    /// The worker.
    pub worker_label: String,
    /// The window these hours fall in.
    pub shift_window: ShiftWindow,
    /// Hours worked in the window.
    pub hours: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// `hours × hourly_rate`, rounded to cents.
    pub base_pay: Decimal,
    /// Share of the window's tip pool, in cents.
    pub tip_share: Decimal,
    /// `base_pay + tip_share`.
    pub total: Decimal,
}

/// Tips that could not be given to anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnallocatedTips {
    /// The window the pool belonged to when it was given up on.
    /// `None` when the whole day had no staffed hours.
    pub shift_window: Option<ShiftWindow>,
    /// The amount left over.
    pub amount: Decimal,
    /// Why it was left over.
    pub reason: String,
}

/// Aggregated totals for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotals {
    /// Hours attributed to a window.
    pub hours: Decimal,
    /// Sum of base pay.
    pub base_pay: Decimal,
    /// Sum of tip shares.
    pub tips_distributed: Decimal,
    /// Sum of unallocated tips.
    pub tips_unallocated: Decimal,
    /// `base_pay + tips_distributed`.
    pub grand_total: Decimal,
}

/// The complete result of a day's payout calculation.
///
/// # Invariant
///
/// `totals.tips_distributed + totals.tips_unallocated` equals the tip input
/// for the day, to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPayout {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The business day.
    pub date: NaiveDate,
    /// One line per worker per window, morning first.
    pub payouts: Vec<PayoutResult>,
    /// Aggregated totals.
    pub totals: DayTotals,
    /// Tips that no worker could receive.
    pub unallocated_tips: Vec<UnallocatedTips>,
    /// Events that were left out.
    pub skipped_events: Vec<SkippedEvent>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl DayPayout {
    /// Returns the payout line for a worker in a window, if any.
    pub fn payout_for(&self, worker_label: &str, window: ShiftWindow) -> Option<&PayoutResult> {
        self.payouts
            .iter()
            .find(|p| p.worker_label == worker_label && p.shift_window == window)
    }

    /// Returns the workers with hours in `window`.
    pub fn workers_in(&self, window: ShiftWindow) -> Vec<&str> {
        self.payouts
            .iter()
            .filter(|p| p.shift_window == window)
            .map(|p| p.worker_label.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(worker: &str, window: ShiftWindow) -> PayoutResult {
        PayoutResult {
            worker_label: worker.to_string(),
            shift_window: window,
            hours: dec("3"),
            hourly_rate: dec("10"),
            base_pay: dec("30.00"),
            tip_share: dec("5.00"),
            total: dec("35.00"),
        }
    }

    fn sample_payout() -> DayPayout {
        DayPayout {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "0.1.0".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            payouts: vec![
                line("Kat", ShiftWindow::Morning),
                line("Rony", ShiftWindow::Afternoon),
                line("Kat", ShiftWindow::Afternoon),
            ],
            totals: DayTotals::default(),
            unallocated_tips: vec![],
            skipped_events: vec![],
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_window_ordering() {
        assert!(ShiftWindow::Morning < ShiftWindow::Afternoon);
        assert_eq!(ShiftWindow::ALL[0], ShiftWindow::Morning);
    }

    #[test]
    fn test_window_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ShiftWindow::Afternoon).unwrap(),
            "\"afternoon\""
        );
    }

    #[test]
    fn test_payout_for() {
        let payout = sample_payout();
        assert!(payout.payout_for("Kat", ShiftWindow::Morning).is_some());
        assert!(payout.payout_for("Rony", ShiftWindow::Morning).is_none());
    }

    #[test]
    fn test_workers_in() {
        let payout = sample_payout();
        assert_eq!(payout.workers_in(ShiftWindow::Afternoon), vec!["Rony", "Kat"]);
    }

    #[test]
    fn test_day_payout_serialization_round_trip() {
        let payout = sample_payout();
        let json = serde_json::to_string(&payout).unwrap();
        let back: DayPayout = serde_json::from_str(&json).unwrap();
        assert_eq!(payout, back);
    }
}
