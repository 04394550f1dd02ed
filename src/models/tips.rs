//! Tip input model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayError, PayResult};

/// Card tips to distribute for one day.
///
/// # Example
///
/// ```
/// use barista_pay::models::TipInput;
///
/// let tips: TipInput = serde_json::from_str(r#"{"mode": "total", "amount": "40.00"}"#).unwrap();
/// assert_eq!(tips.total().to_string(), "40.00");
///
/// let tips: TipInput = serde_json::from_str(
///     r#"{"mode": "per_window", "morning": "12.50", "afternoon": "30"}"#,
/// ).unwrap();
/// assert_eq!(tips.total().to_string(), "42.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TipInput {
    /// One figure for the whole day, split between windows by staffed hours.
    Total {
        /// Tips for the day.
        amount: Decimal,
    },
    /// Separate figures for the morning and afternoon windows.
    PerWindow {
        /// Tips taken during the morning window.
        #[serde(default)]
        morning: Decimal,
        /// Tips taken during the afternoon window.
        #[serde(default)]
        afternoon: Decimal,
    },
}

impl Default for TipInput {
    fn default() -> Self {
        TipInput::Total {
            amount: Decimal::ZERO,
        }
    }
}

impl TipInput {
    /// Returns the sum of all tip figures.
    pub fn total(&self) -> Decimal {
        match *self {
            TipInput::Total { amount } => amount,
            TipInput::PerWindow { morning, afternoon } => morning + afternoon,
        }
    }

    /// Rejects negative amounts and amounts finer than one cent.
    pub fn validate(&self) -> PayResult<()> {
        match *self {
            TipInput::Total { amount } => validate_amount("amount", amount),
            TipInput::PerWindow { morning, afternoon } => {
                validate_amount("morning", morning)?;
                validate_amount("afternoon", afternoon)
            }
        }
    }
}

fn validate_amount(field: &str, amount: Decimal) -> PayResult<()> {
    if amount < Decimal::ZERO {
        return Err(PayError::InvalidTips {
            message: format!("{} {} is negative", field, amount),
        });
    }
    if amount.normalize().scale() > 2 {
        return Err(PayError::InvalidTips {
            message: format!("{} {} has more than two decimal places", field, amount),
        });
    }
    Ok(())
}
