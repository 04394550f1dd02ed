//! Pay period aggregation.
//!
//! Runs the daily calculation for every date in a [`PayPeriod`] and rolls
//! the results up into per-worker summaries, period totals and a schedule
//! matrix showing who opened and who closed each day.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use super::{PayRates, PayoutCalculator};
use crate::error::PayResult;
use crate::models::{
    AuditWarning, DayPayout, PayPeriod, PeriodPayout, PeriodTotals, ScheduleRow, ShiftEvent,
    ShiftWindow, SkipReason, SkippedEvent, TipInput, WorkerSummary, weekday_name,
};

/// Computes payouts for every day of `period`.
///
/// Events are attributed to the date they start on. Events starting outside
/// the period are reported in `skipped_events`; tips for dates outside the
/// period raise a `TIPS_OUTSIDE_PERIOD` warning and are ignored. Days with no
/// entry in `daily_tips` have no tips.
///
/// # Errors
///
/// Propagates the first error from a day's calculation, e.g. `InvalidTips`.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::{compute_period, PayRates, PayoutCalculator};
/// use barista_pay::config::{DayBoundaries, UnstaffedTipPolicy};
/// use barista_pay::models::{PayPeriod, ShiftEvent};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let calculator = PayoutCalculator::new(
///     DayBoundaries::parse("08:00", "14:00", "21:00").unwrap(),
///     UnstaffedTipPolicy::CarryForward,
/// );
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
/// ).unwrap();
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let events = vec![ShiftEvent::new(at("2026-02-03 08:00"), at("2026-02-03 14:00"), "Kat")];
///
/// let payout = compute_period(
///     &calculator,
///     period,
///     &events,
///     &PayRates::flat(Decimal::new(10, 0)).unwrap(),
///     &BTreeMap::new(),
/// ).unwrap();
///
/// assert_eq!(payout.days.len(), 7);
/// assert_eq!(payout.workers[0].opening_shifts, 1);
/// ```
pub fn compute_period(
    calculator: &PayoutCalculator,
    period: PayPeriod,
    events: &[ShiftEvent],
    rates: &PayRates,
    daily_tips: &BTreeMap<NaiveDate, TipInput>,
) -> PayResult<PeriodPayout> {
    let mut warnings = Vec::new();
    let mut skipped_events = Vec::new();
    let mut events_by_day: BTreeMap<NaiveDate, Vec<ShiftEvent>> = BTreeMap::new();

    for event in events {
        let date = event.business_date();
        if period.contains_date(date) {
            events_by_day.entry(date).or_default().push(event.clone());
        } else {
            debug!(date = %date, worker_label = %event.worker_label, "Event outside pay period");
            skipped_events.push(SkippedEvent::from_event(event, SkipReason::OutsidePeriod));
        }
    }

    for (date, tips) in daily_tips.iter().filter(|(d, _)| !period.contains_date(**d)) {
        warnings.push(AuditWarning::new(
            "TIPS_OUTSIDE_PERIOD",
            format!(
                "Tips of ${} for {} are outside {} to {} and were ignored",
                tips.total(),
                date,
                period.start_date,
                period.end_date
            ),
            "medium",
        ));
    }

    let mut days = Vec::with_capacity(period.day_count().max(0) as usize);
    for date in period.days() {
        let day_events = events_by_day.remove(&date).unwrap_or_default();
        let tips = daily_tips.get(&date).copied().unwrap_or_default();
        days.push(calculator.compute_day(date, &day_events, rates, &tips)?);
    }

    let workers = summarize_workers(&days);
    let schedule = build_schedule(&days, &workers);
    let totals = period_totals(period, &days);

    Ok(PeriodPayout {
        calculation_id: Uuid::new_v4(),
        period,
        days,
        workers,
        totals,
        schedule,
        skipped_events,
        warnings,
    })
}

fn summarize_workers(days: &[DayPayout]) -> Vec<WorkerSummary> {
    // keyed by (lowercase, exact) so the map iterates in display order
    let mut summaries: BTreeMap<(String, String), WorkerSummary> = BTreeMap::new();

    for day in days {
        let mut opened: Vec<&str> = Vec::new();
        let mut closed: Vec<&str> = Vec::new();

        for line in &day.payouts {
            let key = (line.worker_label.to_lowercase(), line.worker_label.clone());
            let summary = summaries.entry(key).or_insert_with(|| WorkerSummary {
                worker_label: line.worker_label.clone(),
                hours: Decimal::ZERO,
                base_pay: Decimal::ZERO,
                tips: Decimal::ZERO,
                total: Decimal::ZERO,
                opening_shifts: 0,
                closing_shifts: 0,
            });
            summary.hours += line.hours;
            summary.base_pay += line.base_pay;
            summary.tips += line.tip_share;
            summary.total += line.total;

            let seen = match line.shift_window {
                ShiftWindow::Morning => &mut opened,
                ShiftWindow::Afternoon => &mut closed,
            };
            if !seen.contains(&line.worker_label.as_str()) {
                seen.push(line.worker_label.as_str());
                match line.shift_window {
                    ShiftWindow::Morning => summary.opening_shifts += 1,
                    ShiftWindow::Afternoon => summary.closing_shifts += 1,
                }
            }
        }
    }

    summaries.into_values().collect()
}

fn build_schedule(days: &[DayPayout], workers: &[WorkerSummary]) -> Vec<ScheduleRow> {
    days.iter()
        .map(|day| {
            let openers = day.workers_in(ShiftWindow::Morning);
            let closers = day.workers_in(ShiftWindow::Afternoon);

            let cells = workers
                .iter()
                .map(|worker| {
                    let name = worker.worker_label.as_str();
                    let mut marks = Vec::new();
                    if openers.contains(&name) {
                        marks.push(if openers.len() > 1 { "O*" } else { "O" });
                    }
                    if closers.contains(&name) {
                        marks.push(if closers.len() > 1 { "C*" } else { "C" });
                    }
                    (worker.worker_label.clone(), marks.join("/"))
                })
                .collect();

            ScheduleRow {
                date: day.date,
                day_of_week: weekday_name(day.date.weekday()).to_string(),
                cells,
            }
        })
        .collect()
}

fn period_totals(period: PayPeriod, days: &[DayPayout]) -> PeriodTotals {
    let mut totals = PeriodTotals {
        days: period.day_count(),
        ..PeriodTotals::default()
    };
    for day in days {
        totals.hours += day.totals.hours;
        totals.total_base += day.totals.base_pay;
        totals.total_tips += day.totals.tips_distributed;
        totals.total_unallocated += day.totals.tips_unallocated;
    }
    totals.grand_total = totals.total_base + totals.total_tips;
    totals
}
