//! Calendar event normalization.
//!
//! Converts raw [`CalendarEvent`]s into [`ShiftEvent`]s in shop-local time,
//! attributing each to the workers it names.

use chrono_tz::Tz;
use tracing::debug;

use crate::models::{
    CalendarEvent, Roster, ShiftEvent, SkipReason, SkippedEvent, parse_event_time,
};

/// Events resolved against the roster.
#[derive(Debug, Clone, Default)]
pub struct ResolvedEvents {
    /// One event per matched worker, in input order.
    pub events: Vec<ShiftEvent>,
    /// Calendar entries that could not be used.
    pub skipped: Vec<SkippedEvent>,
}

/// Resolves calendar entries into shift events.
///
/// - An explicit, non-blank `worker_label` is used as is.
/// - Otherwise every roster employee matched by attendee email or by title
///   gets their own event, labelled with the employee's name.
/// - Entries whose timestamps do not parse are skipped as
///   `InvalidTimestamp`; entries nobody matches are skipped as
///   `MissingWorkerLabel` (blank title) or `UnknownWorker`.
///
/// Duration checks are left to the calculator, which reports them per day.
///
/// # Example
///
/// ```
/// use barista_pay::calculation::resolve_events;
/// use barista_pay::models::{CalendarEvent, Employee, Roster};
///
/// let roster = Roster::new(vec![Employee {
///     name: "Kat".to_string(),
///     aliases: vec!["kat@example.com".to_string()],
///     hourly_rate: None,
/// }]);
/// let raw = CalendarEvent {
///     summary: "Close".to_string(),
///     start: "2026-02-03T14:00:00-06:00".to_string(),
///     end: "2026-02-03T21:00:00-06:00".to_string(),
///     attendees: vec!["kat@example.com".to_string()],
///     ..Default::default()
/// };
///
/// let resolved = resolve_events(&[raw], &roster, chrono_tz::America::Chicago);
/// assert_eq!(resolved.events[0].worker_label, "Kat");
/// assert!(resolved.skipped.is_empty());
/// ```
pub fn resolve_events(raw_events: &[CalendarEvent], roster: &Roster, tz: Tz) -> ResolvedEvents {
    let mut resolved = ResolvedEvents::default();

    for raw in raw_events {
        let explicit = raw
            .worker_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty());

        let times = parse_event_time(&raw.start, tz).and_then(|start| {
            parse_event_time(&raw.end, tz).map(|end| (start, end))
        });
        let (start, end) = match times {
            Ok(times) => times,
            Err(err) => {
                debug!(event_id = ?raw.id, error = %err, "Unparseable calendar event");
                resolved.skipped.push(skip(raw, explicit, SkipReason::InvalidTimestamp));
                continue;
            }
        };

        let labels: Vec<String> = match explicit {
            Some(label) => vec![label.to_string()],
            None => roster
                .match_workers(&raw.summary, &raw.attendees)
                .into_iter()
                .map(|employee| employee.name.clone())
                .collect(),
        };

        if labels.is_empty() {
            let reason = if raw.summary.trim().is_empty() {
                SkipReason::MissingWorkerLabel
            } else {
                SkipReason::UnknownWorker
            };
            debug!(
                event_id = ?raw.id,
                summary = %raw.summary,
                %reason,
                "Calendar event matched nobody"
            );
            resolved.skipped.push(skip(raw, None, reason));
            continue;
        }

        for worker_label in labels {
            resolved.events.push(ShiftEvent {
                id: raw.id.clone(),
                start,
                end,
                worker_label,
            });
        }
    }

    resolved
}

fn skip(raw: &CalendarEvent, label: Option<&str>, reason: SkipReason) -> SkippedEvent {
    SkippedEvent {
        event_id: raw.id.clone(),
        worker_label: label.unwrap_or(raw.summary.as_str()).to_string(),
        start: raw.start.clone(),
        end: raw.end.clone(),
        reason,
    }
}
