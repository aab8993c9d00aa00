//! Occurrence generation for a single event.
//!
//! Every series is walked from the event's first occurrence, never from the
//! window start, so an occurrence keeps the same ordinal (and therefore the
//! same synthetic id) whichever window it is queried through. Slots before
//! the window are still counted, just not emitted.

use chrono::{Duration, Months, NaiveDateTime};
use tracing::warn;

use crate::custom;
use crate::error::RuleError;
use crate::event::{EventDefinition, Occurrence};
use crate::exceptions::OccurrenceException;
use crate::recurrence::{Cadence, EndCondition, RecurrenceUnit};
use crate::window::Window;

/// Occurrences of `event` starting inside `window`, in chronological order.
///
/// A non-recurring event is returned once, unchanged, whatever the window.
/// So is an event whose rule is malformed: one broken record must not break
/// the expansion of the rest.
pub fn generate(event: &EventDefinition, window: &Window) -> Vec<Occurrence> {
    let rule = event.rule();

    let cadence = match rule.cadence() {
        Ok(Cadence::Once) => return vec![Occurrence::passthrough(event)],
        Ok(cadence) => cadence,
        Err(err) => return unexpanded(event, err),
    };

    let limits = match rule.end_condition() {
        Ok(limits) => limits,
        Err(err) => return unexpanded(event, err),
    };

    match cadence {
        Cadence::Step { interval, unit } => {
            collect_window(event, window, limits, step_series(event.start, interval, unit))
        }
        Cadence::Weekdays { interval_weeks, days } => {
            custom::expand_weekdays(event, window, limits, interval_weeks, days)
        }
        Cadence::Once => vec![Occurrence::passthrough(event)],
    }
}

/// The earliest occurrence of `event` that starts strictly after `after`.
///
/// Overrides can move an occurrence past later ones, so the series is walked
/// until the first unmoved occurrence after `after` that no moved one can
/// still undercut.
pub fn next_occurrence(event: &EventDefinition, after: NaiveDateTime) -> Option<Occurrence> {
    let once = || (event.start > after).then(|| Occurrence::passthrough(event));

    let (cadence, limits) = match event.rule().validate() {
        Ok((Cadence::Once, _)) | Err(_) => return once(),
        Ok(rule) => rule,
    };

    let last_moved = event
        .exceptions
        .iter()
        .filter(|(_, exception)| matches!(exception, OccurrenceException::Modified(_)))
        .map(|(ordinal, _)| *ordinal)
        .max();

    let mut earliest: Option<Occurrence> = None;

    for occurrence in series_occurrences(event, limits, slots(event, cadence)) {
        if occurrence.start <= after {
            continue;
        }

        let settled = match (occurrence.id.ordinal(), last_moved) {
            (Some(ordinal), Some(last)) => ordinal > last,
            _ => true,
        };

        if earliest
            .as_ref()
            .is_none_or(|best| occurrence.start < best.start)
        {
            earliest = Some(occurrence);
        }

        // Every later slot is unmoved and starts after this one
        if settled {
            break;
        }
    }

    earliest
}

/// Generated start of occurrence `ordinal`, before any exception is applied.
///
/// `None` when the event does not repeat, its rule is malformed, or the
/// series ends before reaching `ordinal`.
pub fn slot_start(event: &EventDefinition, ordinal: u32) -> Option<NaiveDateTime> {
    let (cadence, limits) = event.rule().validate().ok()?;

    if matches!(cadence, Cadence::Once) || ordinal >= limits.max_occurrences {
        return None;
    }

    let start = slots(event, cadence).nth(usize::try_from(ordinal).ok()?)?;
    limits.allows(ordinal, start).then_some(start)
}

fn slots(event: &EventDefinition, cadence: Cadence) -> Box<dyn Iterator<Item = NaiveDateTime>> {
    match cadence {
        Cadence::Step { interval, unit } => Box::new(step_series(event.start, interval, unit)),
        Cadence::Weekdays { interval_weeks, days } => {
            Box::new(custom::weekday_series(event.start, interval_weeks, days))
        }
        Cadence::Once => Box::new(std::iter::once(event.start)),
    }
}

fn unexpanded(event: &EventDefinition, err: RuleError) -> Vec<Occurrence> {
    warn!(
        event_id = %event.id,
        error = %err,
        "Malformed recurrence rule, emitting event unexpanded"
    );
    vec![Occurrence::passthrough(event)]
}

/// Start of the `n`-th step from `start`.
///
/// Computed from the first occurrence rather than the previous one, so month
/// and year steps clamp to the end of short months without drifting.
fn nth_step(start: NaiveDateTime, interval: u32, unit: RecurrenceUnit, n: u32) -> Option<NaiveDateTime> {
    let count = interval.checked_mul(n)?;

    match unit {
        RecurrenceUnit::Days => start.checked_add_signed(Duration::try_days(i64::from(count))?),
        RecurrenceUnit::Weeks => start.checked_add_signed(Duration::try_weeks(i64::from(count))?),
        RecurrenceUnit::Months => start.checked_add_months(Months::new(count)),
        RecurrenceUnit::Years => start.checked_add_months(Months::new(count.checked_mul(12)?)),
    }
}

/// Fixed-step slots; ends when date arithmetic overflows.
pub(crate) fn step_series(
    start: NaiveDateTime,
    interval: u32,
    unit: RecurrenceUnit,
) -> impl Iterator<Item = NaiveDateTime> {
    (0u32..).map_while(move |n| nth_step(start, interval, unit, n))
}

/// Number slots from zero, stop at the end condition and apply exceptions.
pub(crate) fn series_occurrences<'a, I>(
    event: &'a EventDefinition,
    limits: EndCondition,
    slots: I,
) -> impl Iterator<Item = Occurrence> + 'a
where
    I: Iterator<Item = NaiveDateTime> + 'a,
{
    slots
        .zip(0u32..)
        .take_while(move |&(start, ordinal)| limits.allows(ordinal, start))
        .filter_map(move |(start, ordinal)| {
            let occurrence = Occurrence::instance(event, ordinal, start);
            match event.exceptions.get(&ordinal) {
                Some(exception) => exception.apply(occurrence),
                None => Some(occurrence),
            }
        })
}

/// Walk slots up to the window end and keep the occurrences that start inside it.
pub(crate) fn collect_window<I>(
    event: &EventDefinition,
    window: &Window,
    limits: EndCondition,
    slots: I,
) -> Vec<Occurrence>
where
    I: Iterator<Item = NaiveDateTime>,
{
    let window_end = window.end;
    let mut occurrences: Vec<Occurrence> =
        series_occurrences(event, limits, slots.take_while(move |start| *start <= window_end))
            .filter(|occurrence| window.contains(occurrence.start))
            .collect();

    // Slots are already ascending; only moved overrides can break the order
    occurrences.sort_by_key(|occurrence| occurrence.start);
    occurrences
}
