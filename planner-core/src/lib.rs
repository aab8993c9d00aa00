//! Core types for the planner calendar.
//!
//! This crate turns stored event definitions into the occurrences a calendar
//! view renders:
//! - `recurrence`: the rule model (patterns, custom intervals, weekday sets, end conditions)
//! - `generator` / `custom`: expansion of one event over a window
//! - `identity`: synthetic ids for generated instances and their resolution back to events
//! - `batch`: expansion of a whole event list
//!
//! Everything here is pure and synchronous. Times are naive local time.

pub mod batch;
pub mod custom;
pub mod error;
pub mod event;
pub mod exceptions;
pub mod generator;
pub mod identity;
pub mod recurrence;
pub mod window;

pub use batch::{expand_all, sort_chronologically};
pub use custom::{expand_custom, next_custom_occurrence};
pub use error::{PlannerError, PlannerResult, RuleError};
pub use event::{EventDefinition, Occurrence};
pub use exceptions::{InstanceOverride, OccurrenceException};
pub use generator::{generate, next_occurrence, slot_start};
pub use identity::{InstanceId, OccurrenceId, instance_id, is_instance, resolve_id, resolve_original};
pub use recurrence::{
    Cadence, CustomRecurrence, EndCondition, RecurrencePattern, RecurrenceRule, RecurrenceUnit,
    SAFETY_CAP, WeekdaySet,
};
pub use window::Window;
