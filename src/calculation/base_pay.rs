//! Base pay calculation.
//!
//! This module provides the hourly rate lookup (a shop-wide default plus
//! per-worker overrides from the roster) and the base pay calculation for
//! the hours a worker spent in one shift window.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::round_money;
use crate::error::{PayError, PayResult};
use crate::models::{AuditStep, ShiftWindow};

/// Hourly rates in effect for a calculation.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::PayRates;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut overrides = BTreeMap::new();
/// overrides.insert("Youssef".to_string(), Decimal::new(1650, 2));
/// let rates = PayRates::new(Decimal::new(15, 0), overrides).unwrap();
///
/// assert_eq!(rates.rate_for("youssef"), Decimal::new(1650, 2));
/// assert_eq!(rates.rate_for("Kat"), Decimal::new(15, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayRates {
    default: Decimal,
    overrides: BTreeMap<String, Decimal>,
}

impl PayRates {
    /// Creates a rate table, rejecting negative rates.
    pub fn new(default: Decimal, overrides: BTreeMap<String, Decimal>) -> PayResult<Self> {
        if default < Decimal::ZERO {
            return Err(PayError::InvalidRate {
                message: format!("hourly rate {} is negative", default),
            });
        }
        if let Some((name, rate)) = overrides.iter().find(|(_, rate)| **rate < Decimal::ZERO) {
            return Err(PayError::InvalidRate {
                message: format!("hourly rate {} for {} is negative", rate, name),
            });
        }
        Ok(Self { default, overrides })
    }

    /// A single rate for everyone.
    pub fn flat(rate: Decimal) -> PayResult<Self> {
        Self::new(rate, BTreeMap::new())
    }

    /// The shop-wide default rate.
    pub fn default_rate(&self) -> Decimal {
        self.default
    }

    /// Returns the rate for a worker: an exact override, then an override
    /// whose name matches ignoring case, then the default.
    pub fn rate_for(&self, worker_label: &str) -> Decimal {
        self.lookup(worker_label).map_or(self.default, |(_, rate)| rate)
    }

    fn lookup(&self, worker_label: &str) -> Option<(&str, Decimal)> {
        if let Some((name, rate)) = self.overrides.get_key_value(worker_label) {
            return Some((name.as_str(), *rate));
        }
        self.overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(worker_label))
            .map(|(name, rate)| (name.as_str(), *rate))
    }
}

/// The result of a base pay calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct BasePayResult {
    /// The rate applied.
    pub hourly_rate: Decimal,
    /// `hours × hourly_rate`, rounded to cents.
    pub base_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates base pay for a worker's hours in one window.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::{calculate_base_pay, PayRates};
/// use barista_pay::models::ShiftWindow;
/// use rust_decimal::Decimal;
///
/// let rates = PayRates::flat(Decimal::new(10, 0)).unwrap();
/// let result = calculate_base_pay("Kat", ShiftWindow::Morning, Decimal::new(6, 0), &rates, 1);
/// assert_eq!(result.base_pay, Decimal::new(6000, 2));
/// ```
pub fn calculate_base_pay(
    worker_label: &str,
    window: ShiftWindow,
    hours: Decimal,
    rates: &PayRates,
    step_number: u32,
) -> BasePayResult {
    let matched = rates.lookup(worker_label);
    let hourly_rate = matched.map_or(rates.default, |(_, rate)| rate);
    let base_pay = round_money(hours * hourly_rate);

    let source = match matched {
        Some(_) => "employee_override",
        None => "default",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_pay".to_string(),
        rule_name: "Base Pay".to_string(),
        input: serde_json::json!({
            "worker_label": worker_label,
            "shift_window": window,
            "hours": hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.to_string(),
            "rate_source": source,
            "base_pay": base_pay.to_string()
        }),
        reasoning: format!(
            "{}h {} × ${}/hr ({}) = ${}",
            hours.round_dp(2).normalize(),
            window,
            hourly_rate,
            source.replace('_', " "),
            base_pay
        ),
    };

    BasePayResult {
        hourly_rate,
        base_pay,
        audit_step,
    }
}
