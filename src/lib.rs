//! Shift pay and card-tip split calculator for coffee shop staff.
//!
//! This crate turns a day's shift events into per-shift pay: base wages for
//! the hours each barista spent in the morning and afternoon windows, plus
//! their share of that window's card tips. It also normalizes raw calendar
//! events, aggregates pay periods, reads card-terminal tip reports, and
//! serves all of it over a small JSON API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
