//! Synthetic identifiers for generated occurrences.
//!
//! A generated occurrence is identified by its originating event id and its
//! zero-based ordinal in the series. The string form is
//! `"{original_id}_{ordinal}"`; decoding splits on the *last* separator and
//! requires an all-digit suffix, so event ids that themselves contain `_`
//! still resolve.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::event::{EventDefinition, Occurrence};

pub const INSTANCE_SEPARATOR: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId {
    pub original_id: String,
    pub ordinal: u32,
}

impl InstanceId {
    pub fn new(original_id: impl Into<String>, ordinal: u32) -> Self {
        InstanceId {
            original_id: original_id.into(),
            ordinal,
        }
    }

    /// Decode a string produced by `Display`. Returns `None` for anything else.
    pub fn parse(id: &str) -> Option<Self> {
        let (original_id, ordinal) = id.rsplit_once(INSTANCE_SEPARATOR)?;

        if original_id.is_empty()
            || ordinal.is_empty()
            || !ordinal.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        Some(InstanceId {
            original_id: original_id.to_string(),
            ordinal: ordinal.parse().ok()?,
        })
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.original_id, INSTANCE_SEPARATOR, self.ordinal)
    }
}

/// Identity of an emitted occurrence: either the event itself or a generated instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OccurrenceId {
    Original(String),
    Instance(InstanceId),
}

impl OccurrenceId {
    /// Id of the event this occurrence came from.
    pub fn original_id(&self) -> &str {
        match self {
            OccurrenceId::Original(id) => id,
            OccurrenceId::Instance(instance) => &instance.original_id,
        }
    }

    pub fn ordinal(&self) -> Option<u32> {
        match self {
            OccurrenceId::Original(_) => None,
            OccurrenceId::Instance(instance) => Some(instance.ordinal),
        }
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceId::Original(id) => f.write_str(id),
            OccurrenceId::Instance(instance) => fmt::Display::fmt(instance, f),
        }
    }
}

impl Serialize for OccurrenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// String form of the synthetic id for `ordinal` of `original_id`.
pub fn instance_id(original_id: &str, ordinal: u32) -> String {
    InstanceId::new(original_id, ordinal).to_string()
}

pub fn is_instance(occurrence: &Occurrence) -> bool {
    matches!(occurrence.id, OccurrenceId::Instance(_))
}

/// Find the event an occurrence was generated from.
///
/// `None` when the event is no longer in `events` (deleted since expansion).
pub fn resolve_original<'a>(
    occurrence: &Occurrence,
    events: &'a [EventDefinition],
) -> Option<&'a EventDefinition> {
    let original_id = occurrence.id.original_id();
    events.iter().find(|event| event.id == original_id)
}

/// Resolve an opaque id handed back by a view.
///
/// An event whose id matches exactly wins, so an original id that happens to
/// end in `_<digits>` is never mistaken for an instance. Otherwise the id is
/// decoded and its prefix looked up; the ordinal is returned alongside.
pub fn resolve_id<'a>(
    id: &str,
    events: &'a [EventDefinition],
) -> Option<(&'a EventDefinition, Option<u32>)> {
    if let Some(event) = events.iter().find(|event| event.id == id) {
        return Some((event, None));
    }

    let instance = InstanceId::parse(id)?;
    events
        .iter()
        .find(|event| event.id == instance.original_id)
        .map(|event| (event, Some(instance.ordinal)))
}
