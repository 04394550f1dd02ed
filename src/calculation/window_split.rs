//! Shift window segmentation.
//!
//! Splits a shift event at the day boundaries so that each piece belongs to
//! exactly one shift window. An event that spans the switch time is split
//! proportionally by duration: each side gets the minutes that fall inside
//! it. Minutes before opening or after closing belong to no window.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DayBoundaries;
use crate::models::{AuditStep, ShiftEvent, ShiftWindow, hours_between};

/// The part of an event that falls inside one window.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::WindowSegment;
/// use barista_pay::models::ShiftWindow;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let segment = WindowSegment {
///     window: ShiftWindow::Morning,
///     start_time: NaiveDateTime::parse_from_str("2026-02-03 13:00", "%Y-%m-%d %H:%M").unwrap(),
///     end_time: NaiveDateTime::parse_from_str("2026-02-03 14:00", "%Y-%m-%d %H:%M").unwrap(),
///     hours: Decimal::ONE,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSegment {
    /// The window this segment belongs to.
    pub window: ShiftWindow,
    /// The start time of this segment.
    pub start_time: NaiveDateTime,
    /// The end time of this segment.
    pub end_time: NaiveDateTime,
    /// Hours inside the window.
    pub hours: Decimal,
}

/// The result of splitting one event.
#[derive(Debug, Clone)]
pub struct WindowSplit {
    /// Segments in chronological order; at most one per window.
    pub segments: Vec<WindowSegment>,
    /// Hours of the event that fall outside every window.
    pub outside_hours: Decimal,
    /// The audit step recording this split.
    pub audit_step: AuditStep,
}

impl WindowSplit {
    /// Returns the hours that fell in `window`.
    pub fn hours_in(&self, window: ShiftWindow) -> Decimal {
        self.segments
            .iter()
            .filter(|s| s.window == window)
            .map(|s| s.hours)
            .sum()
    }
}

/// Splits an event across the shift windows of `date`.
///
/// # Behavior
///
/// - An event wholly inside one window returns a single segment
/// - An event crossing the switch time returns one segment per side
/// - Time before opening, after closing, or on another date is reported in
///   `outside_hours` and is not part of any segment
///
/// # Example
///
/// ```
/// use barista_pay::calculation::split_by_window;
/// use barista_pay::config::DayBoundaries;
/// use barista_pay::models::{ShiftEvent, ShiftWindow};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let boundaries = DayBoundaries::parse("08:00", "14:00", "21:00").unwrap();
/// let event = ShiftEvent::new(
///     NaiveDateTime::parse_from_str("2026-02-03 13:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     NaiveDateTime::parse_from_str("2026-02-03 15:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     "Kat",
/// );
///
/// let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
/// let split = split_by_window(&event, date, &boundaries, 1);
/// assert_eq!(split.segments.len(), 2);
/// assert_eq!(split.hours_in(ShiftWindow::Morning), Decimal::ONE);
/// assert_eq!(split.hours_in(ShiftWindow::Afternoon), Decimal::ONE);
/// ```
pub fn split_by_window(
    event: &ShiftEvent,
    date: NaiveDate,
    boundaries: &DayBoundaries,
    step_number: u32,
) -> WindowSplit {
    let mut segments = Vec::new();

    for window in ShiftWindow::ALL {
        let (window_start, window_end) = boundaries.window_bounds(date, window);
        let start = event.start.max(window_start);
        let end = event.end.min(window_end);
        if end <= start {
            continue;
        }

        let hours = hours_between(start, end);
        if hours > Decimal::ZERO {
            segments.push(WindowSegment {
                window,
                start_time: start,
                end_time: end,
                hours,
            });
        }
    }

    let inside_minutes: i64 = segments
        .iter()
        .map(|s| (s.end_time - s.start_time).num_minutes())
        .sum();
    let outside_minutes = ((event.end - event.start).num_minutes() - inside_minutes).max(0);
    let outside_hours = Decimal::new(outside_minutes, 0) / Decimal::new(60, 0);

    let audit_step = AuditStep {
        step_number,
        rule_id: "window_split".to_string(),
        rule_name: "Shift Window Split".to_string(),
        input: serde_json::json!({
            "worker_label": event.worker_label,
            "start": event.start.to_string(),
            "end": event.end.to_string(),
            "open": boundaries.open().to_string(),
            "switch": boundaries.switch().to_string(),
            "close": boundaries.close().to_string()
        }),
        output: serde_json::json!({
            "segments": segments
                .iter()
                .map(|s| serde_json::json!({
                    "window": s.window,
                    "hours": s.hours.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "outside_hours": outside_hours.normalize().to_string()
        }),
        reasoning: describe_split(event, &segments, outside_hours),
    };

    WindowSplit {
        segments,
        outside_hours,
        audit_step,
    }
}

fn describe_split(
    event: &ShiftEvent,
    segments: &[WindowSegment],
    outside_hours: Decimal,
) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(|s| format!("{}h {}", s.hours.round_dp(2).normalize(), s.window))
        .collect();
    let mut text = if parts.is_empty() {
        format!("{} worked no hours inside a shift window", event.worker_label)
    } else {
        format!("{} worked {}", event.worker_label, parts.join(" + "))
    };
    if outside_hours > Decimal::ZERO {
        text.push_str(&format!(
            "; {}h outside business hours",
            outside_hours.round_dp(2).normalize()
        ));
    }
    text
}
