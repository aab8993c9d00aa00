//! File-backed event storage: a JSON array of event records.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use planner_core::EventDefinition;
use serde_json::Value;
use tracing::{debug, warn};

pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn open(path: PathBuf) -> Self {
        EventStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all events. A missing file is an empty calendar.
    pub fn load(&self) -> Result<Vec<EventDefinition>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No events file yet");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read events file at {}", self.path.display()))?;

        parse_events(&contents)
            .with_context(|| format!("Failed to parse events file at {}", self.path.display()))
    }

    pub fn save(&self, events: &[EventDefinition]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create events directory at {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(events).context("Failed to serialize events")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write events file at {}", self.path.display()))?;

        Ok(())
    }
}

/// Parse an events file. Records that fail to decode are skipped with a warning
/// so one bad record does not hide the rest of the calendar.
pub fn parse_events(contents: &str) -> Result<Vec<EventDefinition>> {
    let records: Vec<Value> =
        serde_json::from_str(contents).context("Events file is not a JSON array")?;

    let events = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match decode_record(record) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(index, error = %err, "Skipping unreadable event record");
                None
            }
        })
        .collect();

    Ok(events)
}

/// Decode one record. Older records store `customRecurring` as a JSON-encoded
/// string instead of a nested object; both are accepted.
fn decode_record(mut record: Value) -> serde_json::Result<EventDefinition> {
    let legacy = match record.get("customRecurring") {
        Some(Value::String(encoded)) if encoded.trim().is_empty() => Some(Value::Null),
        Some(Value::String(encoded)) => Some(serde_json::from_str::<Value>(encoded)?),
        _ => None,
    };

    if let Some(decoded) = legacy {
        record["customRecurring"] = decoded;
    }

    serde_json::from_value(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{RecurrencePattern, RecurrenceUnit, WeekdaySet};

    const NESTED: &str = r#"[
        {
            "id": "yoga",
            "title": "Yoga",
            "startTime": "2024-01-01T07:00:00",
            "endTime": "2024-01-01T08:00:00",
            "isRecurring": true,
            "recurringPattern": "custom",
            "customRecurring": { "interval": 2, "unit": "weeks", "selectedDays": [1, 3] }
        }
    ]"#;

    #[test]
    fn parses_nested_custom_recurrence() {
        let events = parse_events(NESTED).unwrap();

        assert_eq!(events.len(), 1);
        let rule = events[0].custom_recurring.as_ref().unwrap();
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.selected_days, Some(WeekdaySet::from_indices([1, 3]).unwrap()));
    }

    #[test]
    fn parses_legacy_string_encoded_custom_recurrence() {
        let contents = r#"[
            {
                "id": "legacy",
                "title": "Legacy",
                "startTime": "2024-01-01T07:00:00",
                "endTime": "2024-01-01T08:00:00",
                "isRecurring": true,
                "recurringPattern": "custom",
                "customRecurring": "{\"interval\":3,\"unit\":\"days\",\"endAfterOccurrences\":5}"
            },
            {
                "id": "blank",
                "title": "Blank",
                "startTime": "2024-01-02T07:00:00",
                "endTime": "2024-01-02T08:00:00",
                "isRecurring": true,
                "recurringPattern": "daily",
                "customRecurring": ""
            }
        ]"#;

        let events = parse_events(contents).unwrap();

        assert_eq!(events.len(), 2);
        let rule = events[0].custom_recurring.as_ref().unwrap();
        assert_eq!(rule.unit, RecurrenceUnit::Days);
        assert_eq!(rule.end_after_occurrences, Some(5));
        assert_eq!(events[1].recurring_pattern, RecurrencePattern::Daily);
        assert_eq!(events[1].custom_recurring, None);
    }

    #[test]
    fn skips_unreadable_records() {
        let contents = r#"[
            { "id": "no-times", "title": "Broken" },
            {
                "id": "ok",
                "title": "Fine",
                "startTime": "2024-01-01T07:00:00",
                "endTime": "2024-01-01T08:00:00"
            },
            {
                "id": "bad-json-rule",
                "title": "Broken rule",
                "startTime": "2024-01-01T07:00:00",
                "endTime": "2024-01-01T08:00:00",
                "customRecurring": "{not json"
            }
        ]"#;

        let events = parse_events(contents).unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn rejects_non_array_file() {
        assert!(parse_events(r#"{"id": "x"}"#).is_err());
    }

    #[test]
    fn save_then_load_writes_nested_objects() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("nested").join("events.json"));

        let mut events = parse_events(NESTED).unwrap();
        events[0].cancel_occurrence(3);
        store.save(&events).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"selectedDays\""));
        assert!(raw.contains("\"kind\": \"cancelled\""));

        assert_eq!(store.load().unwrap(), events);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("absent.json"));

        assert!(store.load().unwrap().is_empty());
    }
}
