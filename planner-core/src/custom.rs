//! Weekday-set recurrence ("every 2 weeks on Mon, Wed, Fri").
//!
//! Weeks run Sunday through Saturday. The week containing the event's start
//! is block 0; only weeks whose index is a multiple of the interval are
//! eligible, which is the same as walking day by day and jumping
//! `(interval - 1) * 7` days every time the walk wraps to a Sunday.
//!
//! The event's own start is always occurrence 0, even when its weekday is not
//! selected. Weekday matching starts the day after.

use std::iter;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::event::{EventDefinition, Occurrence};
use crate::generator::{self, collect_window};
use crate::recurrence::{Cadence, EndCondition, WeekdaySet};
use crate::window::Window;

/// Expand an event with a weekday-set rule. Any other rule goes through the
/// general generator.
pub fn expand_custom(event: &EventDefinition, window: &Window) -> Vec<Occurrence> {
    let rule = event.rule();

    match (rule.cadence(), rule.end_condition()) {
        (Ok(Cadence::Weekdays { interval_weeks, days }), Ok(limits)) => {
            expand_weekdays(event, window, limits, interval_weeks, days)
        }
        _ => generator::generate(event, window),
    }
}

pub(crate) fn expand_weekdays(
    event: &EventDefinition,
    window: &Window,
    limits: EndCondition,
    interval_weeks: u32,
    days: WeekdaySet,
) -> Vec<Occurrence> {
    collect_window(
        event,
        window,
        limits,
        weekday_series(event.start, interval_weeks, days),
    )
}

/// Every slot of the series, starting with `start` itself.
pub(crate) fn weekday_series(
    start: NaiveDateTime,
    interval_weeks: u32,
    days: WeekdaySet,
) -> impl Iterator<Item = NaiveDateTime> {
    iter::successors(Some(start), move |&current| {
        next_custom_occurrence(start, interval_weeks, days, current)
    })
}

/// The next slot strictly after `after` for a series first occurring at `series_start`.
///
/// Slots fall on a selected weekday, at the series' time of day, in an
/// eligible week. If `after` is before the series starts, the answer is the
/// series start. `None` when `days` is empty, `interval_weeks` is zero, or the
/// date would overflow.
pub fn next_custom_occurrence(
    series_start: NaiveDateTime,
    interval_weeks: u32,
    days: WeekdaySet,
    after: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if days.is_empty() || interval_weeks == 0 {
        return None;
    }
    if after < series_start {
        return Some(series_start);
    }

    let time = series_start.time();
    let anchor = week_start(series_start.date());
    let interval = i64::from(interval_weeks);

    let mut date = after.date();
    if date.and_time(time) <= after {
        date = date.succ_opt()?;
    }

    // The rest of the current week, then one whole eligible week, always suffices
    for _ in 0..2 {
        let week = (week_start(date) - anchor).num_weeks();
        let offset = week.rem_euclid(interval);
        if offset != 0 {
            let block = week - offset + interval;
            date = anchor.checked_add_signed(Duration::try_weeks(block)?)?;
        }

        loop {
            if days.contains(date.weekday()) {
                return Some(date.and_time(time));
            }
            date = date.succ_opt()?;
            if date.weekday() == Weekday::Sun {
                break;
            }
        }
    }

    None
}

/// Sunday on or before `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    date.checked_sub_signed(back).unwrap_or(date)
}
