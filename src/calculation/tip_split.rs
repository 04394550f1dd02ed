//! Tip pool distribution within one shift window.
//!
//! Each worker's share is proportional to their hours in the window and
//! rounded half up to the cent. Whatever the rounding leaves over (or
//! overshoots) is settled against the worker with the most hours, so the
//! shares always add up to the pool exactly.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::round_money;
use crate::models::{AuditStep, ShiftWindow};

/// A worker's presence in a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowWorker {
    /// The worker.
    pub worker_label: String,
    /// Total hours in the window, across all of the worker's events.
    pub hours: Decimal,
    /// Earliest moment the worker was present in the window.
    pub first_start: NaiveDateTime,
}

/// One worker's share of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipShare {
    /// The worker.
    pub worker_label: String,
    /// The share, in cents.
    pub amount: Decimal,
}

/// The result of distributing a pool.
#[derive(Debug, Clone)]
pub struct TipSplit {
    /// Shares in the same order as the workers passed in.
    pub shares: Vec<TipShare>,
    /// Pool minus the sum of the rounded proportional shares, before
    /// settlement. Positive when rounding left cents over.
    pub remainder: Decimal,
    /// The worker the remainder was settled against.
    pub remainder_recipient: Option<String>,
    /// The audit step recording this distribution.
    pub audit_step: AuditStep,
}

impl TipSplit {
    /// Returns the share for `worker_label`, or zero.
    pub fn share_for(&self, worker_label: &str) -> Decimal {
        self.shares
            .iter()
            .find(|s| s.worker_label == worker_label)
            .map_or(Decimal::ZERO, |s| s.amount)
    }
}

/// Orders workers by remainder priority: most hours, then earliest start,
/// then label.
fn remainder_priority(a: &WindowWorker, b: &WindowWorker) -> Ordering {
    b.hours
        .cmp(&a.hours)
        .then_with(|| a.first_start.cmp(&b.first_start))
        .then_with(|| a.worker_label.cmp(&b.worker_label))
}

/// Distributes `pool` among the workers of one window.
///
/// # Behavior
///
/// - Each share is `round(pool × hours / window_hours)`.
/// - A positive remainder goes entirely to the highest-priority worker.
/// - A negative remainder (rounding overshot the pool) is taken back a cent
///   at a time in priority order, never pushing a share below zero.
/// - With no workers nothing is distributed and the whole pool is the
///   remainder, with no recipient.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::{split_pool, WindowWorker};
/// use barista_pay::models::ShiftWindow;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |t: &str| NaiveDateTime::parse_from_str(&format!("2026-02-03 {}", t), "%Y-%m-%d %H:%M").unwrap();
/// let workers = vec![
///     WindowWorker { worker_label: "Rony".into(), hours: Decimal::new(3, 0), first_start: at("14:00") },
///     WindowWorker { worker_label: "Kat".into(), hours: Decimal::new(5, 0), first_start: at("16:00") },
/// ];
///
/// let split = split_pool(ShiftWindow::Afternoon, Decimal::new(40, 0), &workers, 1);
/// assert_eq!(split.share_for("Rony"), Decimal::new(1500, 2));
/// assert_eq!(split.share_for("Kat"), Decimal::new(2500, 2));
/// ```
pub fn split_pool(
    window: ShiftWindow,
    pool: Decimal,
    workers: &[WindowWorker],
    step_number: u32,
) -> TipSplit {
    let window_hours: Decimal = workers.iter().map(|w| w.hours).sum();

    if workers.is_empty() || window_hours.is_zero() {
        return TipSplit {
            shares: workers
                .iter()
                .map(|w| TipShare {
                    worker_label: w.worker_label.clone(),
                    amount: Decimal::ZERO,
                })
                .collect(),
            remainder: pool,
            remainder_recipient: None,
            audit_step: AuditStep {
                step_number,
                rule_id: "tip_split".to_string(),
                rule_name: "Tip Split".to_string(),
                input: serde_json::json!({
                    "shift_window": window,
                    "pool": pool.to_string(),
                    "workers": []
                }),
                output: serde_json::json!({ "shares": [], "remainder": pool.to_string() }),
                reasoning: format!("No hours in the {} window; nothing distributed", window),
            },
        };
    }

    let mut shares: Vec<TipShare> = workers
        .iter()
        .map(|w| TipShare {
            worker_label: w.worker_label.clone(),
            amount: round_money(pool * w.hours / window_hours),
        })
        .collect();

    let distributed: Decimal = shares.iter().map(|s| s.amount).sum();
    let remainder = pool - distributed;

    let mut order: Vec<usize> = (0..workers.len()).collect();
    order.sort_by(|&a, &b| remainder_priority(&workers[a], &workers[b]));

    let recipient_index = order[0];
    let remainder_recipient = if remainder.is_zero() {
        None
    } else {
        Some(workers[recipient_index].worker_label.clone())
    };

    if remainder > Decimal::ZERO {
        shares[recipient_index].amount += remainder;
    } else if remainder < Decimal::ZERO {
        // Shares and the overshoot are whole cents, so this terminates
        let cent = Decimal::new(1, 2);
        let mut owed = -remainder;
        for &index in order.iter().cycle() {
            if owed <= Decimal::ZERO {
                break;
            }
            if shares[index].amount >= cent {
                shares[index].amount -= cent;
                owed -= cent;
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "tip_split".to_string(),
        rule_name: "Tip Split".to_string(),
        input: serde_json::json!({
            "shift_window": window,
            "pool": pool.to_string(),
            "workers": workers
                .iter()
                .map(|w| serde_json::json!({
                    "worker_label": w.worker_label,
                    "hours": w.hours.normalize().to_string()
                }))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "shares": shares
                .iter()
                .map(|s| serde_json::json!({
                    "worker_label": s.worker_label,
                    "amount": s.amount.to_string()
                }))
                .collect::<Vec<_>>(),
            "remainder": remainder.to_string(),
            "remainder_recipient": remainder_recipient
        }),
        reasoning: match &remainder_recipient {
            Some(name) => format!(
                "${} {} pool split over {}h; rounding remainder ${} settled with {}",
                pool,
                window,
                window_hours.round_dp(2).normalize(),
                remainder,
                name
            ),
            None => format!(
                "${} {} pool split over {}h with no rounding remainder",
                pool,
                window,
                window_hours.round_dp(2).normalize()
            ),
        },
    };

    TipSplit {
        shares,
        remainder,
        remainder_recipient,
        audit_step,
    }
}
