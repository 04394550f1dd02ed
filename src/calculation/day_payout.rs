//! Daily payout calculation.
//!
//! [`PayoutCalculator`] ties the individual rules together for one business
//! day: it validates and splits each shift event across the shift windows,
//! allocates the day's tips into per-window pools, shares each pool among the
//! window's workers and prices their hours.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::{
    PayRates, WindowWorker, allocate_pools, calculate_base_pay, split_by_window, split_pool,
};
use crate::config::{DayBoundaries, UnstaffedTipPolicy};
use crate::error::{PayError, PayResult};
use crate::models::{
    AuditTrace, AuditWarning, DayPayout, DayTotals, PayoutResult, ShiftEvent, ShiftWindow,
    SkipReason, SkippedEvent, TipInput,
};

/// Version string stamped on every result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes payouts for a business day under fixed boundaries and policy.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::{PayRates, PayoutCalculator};
/// use barista_pay::config::{DayBoundaries, UnstaffedTipPolicy};
/// use barista_pay::models::{ShiftEvent, ShiftWindow, TipInput};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let calculator = PayoutCalculator::new(
///     DayBoundaries::parse("08:00", "14:00", "21:00").unwrap(),
///     UnstaffedTipPolicy::CarryForward,
/// );
/// let at = |t: &str| NaiveDateTime::parse_from_str(&format!("2026-02-03 {}", t), "%Y-%m-%d %H:%M").unwrap();
/// let events = vec![ShiftEvent::new(at("08:00"), at("14:00"), "Kat")];
///
/// let payout = calculator
///     .compute_day(
///         NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
///         &events,
///         &PayRates::flat(Decimal::new(10, 0)).unwrap(),
///         &TipInput::Total { amount: Decimal::new(30, 0) },
///     )
///     .unwrap();
///
/// let line = payout.payout_for("Kat", ShiftWindow::Morning).unwrap();
/// assert_eq!(line.base_pay, Decimal::new(6000, 2));
/// assert_eq!(line.tip_share, Decimal::new(3000, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutCalculator {
    boundaries: DayBoundaries,
    policy: UnstaffedTipPolicy,
}

impl PayoutCalculator {
    /// Creates a calculator.
    pub fn new(boundaries: DayBoundaries, policy: UnstaffedTipPolicy) -> Self {
        Self { boundaries, policy }
    }

    /// Returns the day boundaries.
    pub fn boundaries(&self) -> DayBoundaries {
        self.boundaries
    }

    /// Returns the unstaffed tip policy.
    pub fn policy(&self) -> UnstaffedTipPolicy {
        self.policy
    }

    /// Computes the payout for `date`.
    ///
    /// Events that are unusable (zero or negative duration, blank label, or
    /// starting on another date) are skipped and reported, not treated as
    /// errors.
    ///
    /// # Errors
    ///
    /// - `InvalidTips` if the tip input is negative or finer than a cent
    /// - `CalculationError` if the distributed and unallocated tips fail to
    ///   add up to the input
    pub fn compute_day(
        &self,
        date: NaiveDate,
        events: &[ShiftEvent],
        rates: &PayRates,
        tips: &TipInput,
    ) -> PayResult<DayPayout> {
        tips.validate()?;

        let start_time = Instant::now();
        let mut trace = AuditTrace::default();
        let mut skipped_events = Vec::new();
        let mut presence: BTreeMap<ShiftWindow, Vec<WindowWorker>> = BTreeMap::new();

        for event in events {
            let usable = event.validate().and_then(|()| {
                if event.business_date() == date {
                    Ok(())
                } else {
                    Err(SkipReason::OutsidePeriod)
                }
            });
            if let Err(reason) = usable {
                debug!(
                    date = %date,
                    worker_label = %event.worker_label,
                    reason = %reason,
                    "Skipping shift event"
                );
                trace.warnings.push(AuditWarning::new(
                    "SKIPPED_EVENT",
                    format!(
                        "Skipped event for '{}' ({} to {}): {}",
                        event.worker_label, event.start, event.end, reason
                    ),
                    "medium",
                ));
                skipped_events.push(SkippedEvent::from_event(event, reason));
                continue;
            }

            let split = split_by_window(event, date, &self.boundaries, trace.next_step_number());
            if split.outside_hours > Decimal::ZERO {
                trace.warnings.push(AuditWarning::new(
                    "OUTSIDE_BUSINESS_HOURS",
                    format!(
                        "{}h of {}'s event ({} to {}) fall outside business hours and are unpaid",
                        split.outside_hours.round_dp(2).normalize(),
                        event.worker_label,
                        event.start,
                        event.end
                    ),
                    "low",
                ));
            }

            for segment in &split.segments {
                let workers = presence.entry(segment.window).or_default();
                match workers
                    .iter_mut()
                    .find(|w| w.worker_label == event.worker_label)
                {
                    Some(worker) => {
                        worker.hours += segment.hours;
                        worker.first_start = worker.first_start.min(segment.start_time);
                    }
                    None => workers.push(WindowWorker {
                        worker_label: event.worker_label.clone(),
                        hours: segment.hours,
                        first_start: segment.start_time,
                    }),
                }
            }
            trace.steps.push(split.audit_step);
        }

        for workers in presence.values_mut() {
            workers.sort_by(|a, b| {
                a.first_start
                    .cmp(&b.first_start)
                    .then_with(|| a.worker_label.cmp(&b.worker_label))
            });
        }

        let window_hours = |window: ShiftWindow| -> Decimal {
            presence
                .get(&window)
                .map_or(Decimal::ZERO, |workers| workers.iter().map(|w| w.hours).sum())
        };

        let pools = allocate_pools(
            tips,
            window_hours(ShiftWindow::Morning),
            window_hours(ShiftWindow::Afternoon),
            self.policy,
            trace.next_step_number(),
        );
        trace.steps.push(pools.audit_step.clone());

        if pools.carried_forward > Decimal::ZERO {
            trace.warnings.push(AuditWarning::new(
                "TIPS_CARRIED_FORWARD",
                format!(
                    "${} of morning tips moved to the afternoon pool \
                     because nobody worked the morning",
                    pools.carried_forward
                ),
                "low",
            ));
        }
        for unallocated in &pools.unallocated {
            debug!(
                date = %date,
                amount = %unallocated.amount,
                reason = %unallocated.reason,
                "Tips left unallocated"
            );
            trace.warnings.push(AuditWarning::new(
                "UNALLOCATED_TIPS",
                format!("${} of tips unallocated: {}", unallocated.amount, unallocated.reason),
                "high",
            ));
        }

        let mut payouts = Vec::new();
        for window in ShiftWindow::ALL {
            let Some(workers) = presence.get(&window) else {
                continue;
            };

            let split = split_pool(window, pools.pool(window), workers, trace.next_step_number());
            trace.steps.push(split.audit_step.clone());

            for worker in workers {
                let base = calculate_base_pay(
                    &worker.worker_label,
                    window,
                    worker.hours,
                    rates,
                    trace.next_step_number(),
                );
                trace.steps.push(base.audit_step);

                let tip_share = split.share_for(&worker.worker_label);
                payouts.push(PayoutResult {
                    worker_label: worker.worker_label.clone(),
                    shift_window: window,
                    hours: worker.hours.round_dp(2),
                    hourly_rate: base.hourly_rate,
                    base_pay: base.base_pay,
                    tip_share,
                    total: base.base_pay + tip_share,
                });
            }
        }

        let base_pay: Decimal = payouts.iter().map(|p| p.base_pay).sum();
        let tips_distributed: Decimal = payouts.iter().map(|p| p.tip_share).sum();
        let totals = DayTotals {
            hours: payouts.iter().map(|p| p.hours).sum(),
            base_pay,
            tips_distributed,
            tips_unallocated: pools.unallocated_total(),
            grand_total: base_pay + tips_distributed,
        };

        if totals.tips_distributed + totals.tips_unallocated != tips.total() {
            return Err(PayError::CalculationError {
                message: format!(
                    "tips for {} do not balance: ${} distributed + ${} unallocated != ${}",
                    date,
                    totals.tips_distributed,
                    totals.tips_unallocated,
                    tips.total()
                ),
            });
        }

        trace.push_step(
            "day_totals",
            "Day Totals",
            serde_json::json!({
                "date": date.to_string(),
                "payout_lines": payouts.len()
            }),
            serde_json::json!({
                "hours": totals.hours.to_string(),
                "base_pay": totals.base_pay.to_string(),
                "tips_distributed": totals.tips_distributed.to_string(),
                "tips_unallocated": totals.tips_unallocated.to_string(),
                "grand_total": totals.grand_total.to_string()
            }),
            format!(
                "Base ${} + tips ${} = ${}; ${} unallocated",
                totals.base_pay,
                totals.tips_distributed,
                totals.grand_total,
                totals.tips_unallocated
            ),
        );

        trace.duration_us = start_time.elapsed().as_micros() as u64;

        Ok(DayPayout {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            date,
            payouts,
            totals,
            unallocated_tips: pools.unallocated,
            skipped_events,
            audit_trace: trace,
        })
    }
}
