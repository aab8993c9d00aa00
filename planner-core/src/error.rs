//! Error types for the planner core.

use thiserror::Error;

/// Why a stored recurrence rule cannot be expanded.
///
/// Expansion never surfaces these to callers: an event with a malformed rule
/// is emitted once, unexpanded. They are returned by explicit validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("custom pattern without a customRecurring rule")]
    MissingCustomRecurrence,

    #[error("interval must be positive, got {0}")]
    NonPositiveInterval(i64),

    #[error("endAfterOccurrences must be at least 1")]
    ZeroOccurrenceLimit,

    #[error("weekday index {0} is out of range (expected 0-6)")]
    WeekdayOutOfRange(u8),
}

/// Errors that can occur in planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
