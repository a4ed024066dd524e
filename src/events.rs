use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Start or end of a generated event, as produced by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// RFC 3339 instant, e.g. `2025-06-02T09:00:00-04:00`.
    pub date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// A generated calendar event. Read-only for this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventTime {
    /// The `YYYY-MM-DD` prefix of the instant (the whole string if shorter).
    pub fn date_key(&self) -> &str {
        self.date_time.get(..10).unwrap_or(&self.date_time)
    }
}

impl CalendarEvent {
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start.date_key(), "%Y-%m-%d").ok()
    }
}

/// Buckets events by the date prefix of their start instant.
///
/// Dates come back sorted; events keep their input order within a date.
pub fn group_events_by_date(events: &[CalendarEvent]) -> BTreeMap<String, Vec<CalendarEvent>> {
    let mut grouped: BTreeMap<String, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events {
        grouped
            .entry(event.start.date_key().to_string())
            .or_default()
            .push(event.clone());
    }
    grouped
}
