//! Employee and roster models.
//!
//! The roster is how raw calendar events get tied to people: an event is
//! attributed to an employee when one of its attendee emails is among the
//! employee's aliases, or when the employee's name or an alias appears in the
//! event title as whole words.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Display name; also the worker label on every payout line.
    pub name: String,
    /// Alternative spellings, nicknames and attendee emails.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Optional own hourly rate, overriding the shop default.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

impl Employee {
    /// Returns true if `email` is one of this employee's aliases.
    ///
    /// # Examples
    ///
    /// ```
    /// use barista_pay::models::Employee;
    ///
    /// let kat = Employee {
    ///     name: "Kat".to_string(),
    ///     aliases: vec!["kat@example.com".to_string()],
    ///     hourly_rate: None,
    /// };
    /// assert!(kat.matches_email("KAT@example.com"));
    /// assert!(!kat.matches_email(""));
    /// ```
    pub fn matches_email(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty()
            && self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(email))
    }

    /// Returns true if the name or an alias appears in `title` as whole words.
    ///
    /// # Examples
    ///
    /// ```
    /// use barista_pay::models::Employee;
    ///
    /// let kat = Employee {
    ///     name: "Kat".to_string(),
    ///     aliases: vec!["katherine".to_string()],
    ///     hourly_rate: None,
    /// };
    /// assert!(kat.matches_title("Opening - kat"));
    /// assert!(!kat.matches_title("Kathy closes"));
    /// ```
    pub fn matches_title(&self, title: &str) -> bool {
        let title_words = words(title);
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|candidate| contains_phrase(&title_words, &words(candidate)))
    }
}

/// The shop's staff list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    employees: Vec<Employee>,
}

impl Roster {
    /// Creates a roster from a list of employees.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// Returns all employees in roster order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Returns the employees an event belongs to.
    ///
    /// Attendee email matches are checked first; title matches are only
    /// consulted for employees not already matched by email. Each employee
    /// appears at most once, in roster order.
    pub fn match_workers(&self, title: &str, attendees: &[String]) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|employee| {
                attendees.iter().any(|email| employee.matches_email(email))
                    || employee.matches_title(title)
            })
            .collect()
    }

    /// Returns the per-employee hourly rates, keyed by name.
    pub fn rate_overrides(&self) -> BTreeMap<String, Decimal> {
        self.employees
            .iter()
            .filter_map(|e| e.hourly_rate.map(|rate| (e.name.clone(), rate)))
            .collect()
    }
}

/// Splits text into lower-cased alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns true if `needle` occurs as a contiguous run inside `haystack`.
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}
