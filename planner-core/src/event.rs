//! Event definitions and the occurrences expanded from them.
//!
//! All instants are naive local time. An [`EventDefinition`] is the stored
//! record; an [`Occurrence`] is what a calendar view renders and is never
//! stored.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::exceptions::{InstanceOverride, OccurrenceException};
use crate::identity::{InstanceId, OccurrenceId};
use crate::recurrence::{CustomRecurrence, RecurrencePattern, RecurrenceRule};
use crate::window::{end_of_day, start_of_day};

/// A stored calendar event, possibly repeating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Start of the first occurrence
    #[serde(rename = "startTime")]
    pub start: NaiveDateTime,
    /// End of the first occurrence
    #[serde(rename = "endTime")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,

    // Recurrence fields
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_pattern: RecurrencePattern,
    /// Only meaningful for `custom`, but end conditions are read from it for every pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_recurring: Option<CustomRecurrence>,

    /// Per-occurrence exceptions keyed by ordinal
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exceptions: BTreeMap<u32, OccurrenceException>,
}

impl EventDefinition {
    /// A timed, non-recurring event with no payload beyond its title.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        EventDefinition {
            id: id.into(),
            title: title.into(),
            description: None,
            color: None,
            location: None,
            notes: None,
            start,
            end,
            all_day: false,
            is_recurring: false,
            recurring_pattern: RecurrencePattern::None,
            custom_recurring: None,
            exceptions: BTreeMap::new(),
        }
    }

    pub fn rule(&self) -> RecurrenceRule<'_> {
        RecurrenceRule {
            is_recurring: self.is_recurring,
            pattern: self.recurring_pattern,
            custom: self.custom_recurring.as_ref(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Pin an all-day event to the whole of its start date.
    pub fn clamp_all_day(&mut self) {
        if !self.all_day {
            return;
        }
        let date = self.start.date();
        self.start = start_of_day(date);
        self.end = end_of_day(date);
    }

    /// Check the invariants enforced when an event is created or edited.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.id.is_empty() {
            return Err(PlannerError::InvalidEvent("event id is empty".into()));
        }

        if self.all_day {
            if self.end < self.start {
                return Err(PlannerError::InvalidEvent(format!(
                    "all-day event '{}' ends before it starts",
                    self.id
                )));
            }
        } else if self.end <= self.start {
            return Err(PlannerError::InvalidEvent(format!(
                "event '{}' must end after it starts",
                self.id
            )));
        }

        self.rule().validate()?;
        Ok(())
    }

    pub fn cancel_occurrence(&mut self, ordinal: u32) {
        self.exceptions
            .insert(ordinal, OccurrenceException::Cancelled);
    }

    pub fn override_occurrence(&mut self, ordinal: u32, changes: InstanceOverride) {
        self.exceptions
            .insert(ordinal, OccurrenceException::Modified(changes));
    }

    /// Drop any exception for `ordinal`, restoring the generated occurrence.
    pub fn restore_occurrence(&mut self, ordinal: u32) -> Option<OccurrenceException> {
        self.exceptions.remove(&ordinal)
    }
}

/// One displayable occurrence of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "startTime")]
    pub start: NaiveDateTime,
    #[serde(rename = "endTime")]
    pub end: NaiveDateTime,
    pub all_day: bool,
    /// A per-instance override was applied
    pub modified: bool,
}

impl Occurrence {
    /// The event itself, unexpanded, under its own id.
    pub fn passthrough(event: &EventDefinition) -> Self {
        Self::with_id(event, OccurrenceId::Original(event.id.clone()), event.start, event.end)
    }

    /// The `ordinal`-th generated instance of `event`, starting at `start`.
    pub fn instance(event: &EventDefinition, ordinal: u32, start: NaiveDateTime) -> Self {
        let end = start.checked_add_signed(event.duration()).unwrap_or(start);
        let id = OccurrenceId::Instance(InstanceId::new(event.id.clone(), ordinal));
        Self::with_id(event, id, start, end)
    }

    fn with_id(
        event: &EventDefinition,
        id: OccurrenceId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Occurrence {
            id,
            title: event.title.clone(),
            description: event.description.clone(),
            color: event.color.clone(),
            location: event.location.clone(),
            notes: event.notes.clone(),
            start,
            end,
            all_day: event.all_day,
            modified: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
