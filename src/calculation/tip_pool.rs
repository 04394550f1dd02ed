//! Tip pool allocation.
//!
//! Turns a day's [`TipInput`] into one distributable pool per shift window,
//! and decides what happens to a pool whose window nobody worked.

use rust_decimal::Decimal;

use super::round_money;
use crate::config::UnstaffedTipPolicy;
use crate::models::{AuditStep, ShiftWindow, TipInput, UnallocatedTips};

/// The pools to distribute for one day.
#[derive(Debug, Clone)]
pub struct PoolAllocation {
    /// Morning pool, to be shared among morning workers.
    pub morning: Decimal,
    /// Afternoon pool, including anything carried forward.
    pub afternoon: Decimal,
    /// Amount moved from the morning pool onto the afternoon pool.
    pub carried_forward: Decimal,
    /// Pools nobody can receive.
    pub unallocated: Vec<UnallocatedTips>,
    /// The audit step recording this allocation.
    pub audit_step: AuditStep,
}

impl PoolAllocation {
    /// Returns the distributable pool for `window`.
    pub fn pool(&self, window: ShiftWindow) -> Decimal {
        match window {
            ShiftWindow::Morning => self.morning,
            ShiftWindow::Afternoon => self.afternoon,
        }
    }

    /// Sum of everything that could not be distributed.
    pub fn unallocated_total(&self) -> Decimal {
        self.unallocated.iter().map(|u| u.amount).sum()
    }
}

/// Allocates the day's tips into per-window pools.
///
/// # Behavior
///
/// - `PerWindow` tips map straight onto the two pools.
/// - `Total` tips are split by staffed hours: the morning pool is the
///   rounded proportional share and the afternoon pool is the exact
///   remainder. With no staffed hours at all the whole amount is
///   unallocated.
/// - A pool with no staffed hours is carried from morning to afternoon under
///   [`UnstaffedTipPolicy::CarryForward`] when the afternoon was staffed, and
///   is otherwise reported as unallocated.
///
/// `morning_pool + afternoon_pool + unallocated` always equals the input.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::allocate_pools;
/// use barista_pay::config::UnstaffedTipPolicy;
/// use barista_pay::models::TipInput;
/// use rust_decimal::Decimal;
///
/// let tips = TipInput::Total { amount: Decimal::new(30, 0) };
/// let pools = allocate_pools(&tips, Decimal::new(2, 0), Decimal::new(4, 0), UnstaffedTipPolicy::CarryForward, 1);
/// assert_eq!(pools.morning, Decimal::new(1000, 2));
/// assert_eq!(pools.afternoon, Decimal::new(2000, 2));
/// ```
pub fn allocate_pools(
    tips: &TipInput,
    morning_hours: Decimal,
    afternoon_hours: Decimal,
    policy: UnstaffedTipPolicy,
    step_number: u32,
) -> PoolAllocation {
    let day_hours = morning_hours + afternoon_hours;
    let mut unallocated = Vec::new();
    let mut carried_forward = Decimal::ZERO;

    let (mut morning, mut afternoon) = match *tips {
        TipInput::PerWindow { morning, afternoon } => (morning, afternoon),
        TipInput::Total { amount } if day_hours.is_zero() => {
            if amount > Decimal::ZERO {
                unallocated.push(UnallocatedTips {
                    shift_window: None,
                    amount,
                    reason: "no staffed hours on this day".to_string(),
                });
            }
            (Decimal::ZERO, Decimal::ZERO)
        }
        TipInput::Total { amount } => {
            let morning = round_money(amount * morning_hours / day_hours);
            (morning, amount - morning)
        }
    };

    if morning > Decimal::ZERO && morning_hours.is_zero() {
        let can_carry =
            policy == UnstaffedTipPolicy::CarryForward && afternoon_hours > Decimal::ZERO;
        if can_carry {
            carried_forward = morning;
            afternoon += morning;
        } else {
            unallocated.push(UnallocatedTips {
                shift_window: Some(ShiftWindow::Morning),
                amount: morning,
                reason: match policy {
                    UnstaffedTipPolicy::CarryForward => {
                        "no staffed hours in the morning or afternoon window".to_string()
                    }
                    UnstaffedTipPolicy::Unallocated => {
                        "no staffed hours in the morning window".to_string()
                    }
                },
            });
        }
        morning = Decimal::ZERO;
    }

    if afternoon > Decimal::ZERO && afternoon_hours.is_zero() {
        unallocated.push(UnallocatedTips {
            shift_window: Some(ShiftWindow::Afternoon),
            amount: afternoon,
            reason: "no staffed hours in the afternoon window".to_string(),
        });
        afternoon = Decimal::ZERO;
    }

    let unallocated_total: Decimal = unallocated.iter().map(|u| u.amount).sum();
    let mut reasoning = format!(
        "Tips ${} split into morning pool ${} and afternoon pool ${}",
        tips.total(),
        morning,
        afternoon
    );
    if carried_forward > Decimal::ZERO {
        reasoning.push_str(&format!(
            "; ${} carried from the unstaffed morning",
            carried_forward
        ));
    }
    if unallocated_total > Decimal::ZERO {
        reasoning.push_str(&format!("; ${} unallocated", unallocated_total));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "tip_pool_allocation".to_string(),
        rule_name: "Tip Pool Allocation".to_string(),
        input: serde_json::json!({
            "tips": tips,
            "morning_hours": morning_hours.normalize().to_string(),
            "afternoon_hours": afternoon_hours.normalize().to_string(),
            "policy": policy
        }),
        output: serde_json::json!({
            "morning_pool": morning.to_string(),
            "afternoon_pool": afternoon.to_string(),
            "carried_forward": carried_forward.to_string(),
            "unallocated": unallocated_total.to_string()
        }),
        reasoning,
    };

    PoolAllocation {
        morning,
        afternoon,
        carried_forward,
        unallocated,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn per_window(morning: &str, afternoon: &str) -> TipInput {
        TipInput::PerWindow {
            morning: dec(morning),
            afternoon: dec(afternoon),
        }
    }

    fn conserved(pools: &PoolAllocation, tips: &TipInput) -> bool {
        pools.morning + pools.afternoon + pools.unallocated_total() == tips.total()
    }

    #[test]
    fn test_per_window_pools_pass_through() {
        let tips = per_window("12.50", "30.00");
        let pools = allocate_pools(&tips, dec("6"), dec("7"), UnstaffedTipPolicy::CarryForward, 1);
        assert_eq!(pools.morning, dec("12.50"));
        assert_eq!(pools.afternoon, dec("30.00"));
        assert!(pools.unallocated.is_empty());
        assert!(conserved(&pools, &tips));
    }

    #[test]
    fn test_total_split_by_hours_remainder_to_afternoon() {
        // 10 × 1/3 = 3.333.. → 3.33, afternoon gets 6.67
        let tips = TipInput::Total { amount: dec("10") };
        let pools = allocate_pools(&tips, dec("1"), dec("2"), UnstaffedTipPolicy::CarryForward, 1);
        assert_eq!(pools.morning, dec("3.33"));
        assert_eq!(pools.afternoon, dec("6.67"));
        assert!(conserved(&pools, &tips));
    }

    #[test]
    fn test_total_with_only_morning_staffed() {
        let tips = TipInput::Total { amount: dec("30") };
        let pools = allocate_pools(
            &tips,
            dec("6"),
            Decimal::ZERO,
            UnstaffedTipPolicy::CarryForward,
            1,
        );
        assert_eq!(pools.morning, dec("30.00"));
        assert_eq!(pools.afternoon, Decimal::ZERO);
        assert!(pools.unallocated.is_empty());
    }

    #[test]
    fn test_total_with_no_hours_is_unallocated() {
        let tips = TipInput::Total { amount: dec("25") };
        let pools = allocate_pools(
            &tips,
            Decimal::ZERO,
            Decimal::ZERO,
            UnstaffedTipPolicy::CarryForward,
            1,
        );
        assert_eq!(pools.unallocated.len(), 1);
        assert_eq!(pools.unallocated[0].shift_window, None);
        assert_eq!(pools.unallocated[0].amount, dec("25"));
        assert!(conserved(&pools, &tips));
    }

    #[test]
    fn test_unstaffed_morning_carries_forward() {
        let tips = per_window("12", "20");
        let pools = allocate_pools(
            &tips,
            Decimal::ZERO,
            dec("7"),
            UnstaffedTipPolicy::CarryForward,
            1,
        );
        assert_eq!(pools.morning, Decimal::ZERO);
        assert_eq!(pools.afternoon, dec("32"));
        assert_eq!(pools.carried_forward, dec("12"));
        assert!(pools.unallocated.is_empty());
        assert!(pools.audit_step.reasoning.contains("carried"));
    }

    #[test]
    fn test_unstaffed_morning_unallocated_policy() {
        let tips = per_window("12", "20");
        let pools = allocate_pools(
            &tips,
            Decimal::ZERO,
            dec("7"),
            UnstaffedTipPolicy::Unallocated,
            1,
        );
        assert_eq!(pools.afternoon, dec("20"));
        assert_eq!(pools.carried_forward, Decimal::ZERO);
        assert_eq!(pools.unallocated.len(), 1);
        assert_eq!(pools.unallocated[0].shift_window, Some(ShiftWindow::Morning));
        assert!(conserved(&pools, &tips));
    }

    #[test]
    fn test_unstaffed_afternoon_is_unallocated() {
        let tips = per_window("10", "15");
        let pools = allocate_pools(
            &tips,
            dec("6"),
            Decimal::ZERO,
            UnstaffedTipPolicy::CarryForward,
            1,
        );
        assert_eq!(pools.morning, dec("10"));
        assert_eq!(pools.afternoon, Decimal::ZERO);
        assert_eq!(pools.unallocated.len(), 1);
        assert_eq!(pools.unallocated[0].shift_window, Some(ShiftWindow::Afternoon));
        assert_eq!(pools.unallocated[0].amount, dec("15"));
    }

    #[test]
    fn test_both_windows_unstaffed_per_window() {
        let tips = per_window("10", "15");
        let pools = allocate_pools(
            &tips,
            Decimal::ZERO,
            Decimal::ZERO,
            UnstaffedTipPolicy::CarryForward,
            1,
        );
        assert_eq!(pools.unallocated.len(), 2);
        assert_eq!(pools.unallocated_total(), dec("25"));
        assert!(conserved(&pools, &tips));
    }

    #[test]
    fn test_zero_tips_with_no_hours_has_nothing_unallocated() {
        let pools = allocate_pools(
            &TipInput::default(),
            Decimal::ZERO,
            Decimal::ZERO,
            UnstaffedTipPolicy::CarryForward,
            4,
        );
        assert!(pools.unallocated.is_empty());
        assert_eq!(pools.audit_step.step_number, 4);
    }
}
