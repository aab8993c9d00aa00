//! Per-occurrence exceptions: cancelled or individually edited instances.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event::Occurrence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OccurrenceException {
    /// Skipped. The ordinal stays consumed so later instance ids do not shift.
    Cancelled,
    Modified(InstanceOverride),
}

impl OccurrenceException {
    pub fn apply(&self, occurrence: Occurrence) -> Option<Occurrence> {
        match self {
            OccurrenceException::Cancelled => None,
            OccurrenceException::Modified(changes) => Some(changes.apply_to(occurrence)),
        }
    }
}

/// Fields replaced on a single instance. `None` keeps the generated value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
}

impl InstanceOverride {
    pub fn apply_to(&self, mut occurrence: Occurrence) -> Occurrence {
        let duration = occurrence.duration();

        if let Some(title) = &self.title {
            occurrence.title = title.clone();
        }
        if let Some(description) = &self.description {
            occurrence.description = Some(description.clone());
        }
        if let Some(color) = &self.color {
            occurrence.color = Some(color.clone());
        }
        if let Some(location) = &self.location {
            occurrence.location = Some(location.clone());
        }
        if let Some(notes) = &self.notes {
            occurrence.notes = Some(notes.clone());
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                occurrence.start = start;
                occurrence.end = end;
            }
            // Moving only the start keeps the series duration
            (Some(start), None) => {
                occurrence.start = start;
                occurrence.end = start.checked_add_signed(duration).unwrap_or(start);
            }
            (None, Some(end)) => occurrence.end = end,
            (None, None) => {}
        }

        occurrence.modified = true;
        occurrence
    }
}
