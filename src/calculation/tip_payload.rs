//! Card-terminal tip report parsing.
//!
//! The terminal's tip report, copied as text, lists one block per day:
//!
//! ```text
//! 02-10-2026
//! 12:15 AM
//! Tips
//! Tuesday, February 3, 2026 8:00 AM - Tuesday, February 3, 2026 9:00 PM
//! $88.20
//! ```
//!
//! A line carrying a `Weekday, Month D, YYYY` date starts an entry; the first
//! dollar amount on that line or the two lines after it is the day's tips.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::{PayPeriod, TipInput};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Number of lines, including the date line, searched for an amount.
const AMOUNT_LOOKAHEAD: usize = 3;

/// Daily tip totals read from a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipPayload {
    /// Tips per date inside the requested range.
    pub daily_tips: BTreeMap<NaiveDate, Decimal>,
    /// One message per entry that fell outside the range.
    pub warnings: Vec<String>,
}

impl TipPayload {
    /// Returns the daily totals as calculator input.
    pub fn tip_inputs(&self) -> BTreeMap<NaiveDate, TipInput> {
        self.daily_tips
            .iter()
            .map(|(date, amount)| (*date, TipInput::Total { amount: *amount }))
            .collect()
    }
}

/// Extracts per-day tip totals from the text of a tip report.
///
/// Later entries for the same date replace earlier ones. Dates that do not
/// exist (e.g. February 30) are ignored.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::parse_tip_payload;
/// use barista_pay::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 2, 8).unwrap(),
/// ).unwrap();
/// let text = "Tips\nTuesday, February 3, 2026 8:00 AM - Tuesday, February 3, 2026 9:00 PM\n$88.20\n";
///
/// let payload = parse_tip_payload(text, &period);
/// let tuesday = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
/// assert_eq!(payload.daily_tips[&tuesday].to_string(), "88.20");
/// ```
pub fn parse_tip_payload(text: &str, period: &PayPeriod) -> TipPayload {
    let lines: Vec<&str> = text.trim().lines().collect();
    let mut payload = TipPayload::default();

    for (index, line) in lines.iter().enumerate() {
        let Some(date) = find_long_date(line) else {
            continue;
        };

        let end = (index + AMOUNT_LOOKAHEAD).min(lines.len());
        let Some(amount) = lines[index..end].iter().find_map(|l| find_dollar_amount(l)) else {
            continue;
        };

        if period.contains_date(date) {
            payload.daily_tips.insert(date, amount);
        } else {
            let mut shown = amount;
            shown.rescale(2);
            payload.warnings.push(format!(
                "Date {} (${}) is outside selected range and will be skipped",
                date, shown
            ));
        }
    }

    payload
}

/// Finds the first `Weekday, Month D, YYYY` date in a line.
fn find_long_date(line: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    tokens.windows(4).find_map(|window| {
        let weekday = window[0].strip_suffix(',')?;
        let is_weekday = weekday.len() > 3
            && weekday.chars().all(|c| c.is_ascii_alphabetic())
            && weekday.to_ascii_lowercase().ends_with("day");
        if !is_weekday {
            return None;
        }

        let month_name = window[1].to_ascii_lowercase();
        let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;

        let day_text = window[2].strip_suffix(',')?;
        if day_text.is_empty()
            || day_text.len() > 2
            || !day_text.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let day: u32 = day_text.parse().ok()?;

        let year_text = window[3].get(..4)?;
        if !year_text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year: i32 = year_text.parse().ok()?;

        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Finds the first `$` followed by an amount, e.g. `$88.20`, `$ 40` or
/// `$1,250.00`.
fn find_dollar_amount(line: &str) -> Option<Decimal> {
    line.match_indices('$').find_map(|(position, _)| {
        let rest = line[position + 1..].trim_start();
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let whole_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == ','))
            .unwrap_or(rest.len());
        let mut number: String = rest[..whole_len].chars().filter(char::is_ascii_digit).collect();

        let cents = rest[whole_len..]
            .strip_prefix('.')
            .and_then(|after| after.get(..2))
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()));
        if let Some(cents) = cents {
            number.push('.');
            number.push_str(cents);
        }

        Decimal::from_str(&number).ok()
    })
}
