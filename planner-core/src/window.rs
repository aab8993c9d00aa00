//! Query window for expansion.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{PlannerError, PlannerResult};

/// Inclusive `[start, end]` range of naive local instants.
///
/// Edges need not be midnight-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> PlannerResult<Self> {
        if start > end {
            return Err(PlannerError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Window { start, end })
    }

    /// Whole days from `from` through `to`, both inclusive.
    pub fn days(from: NaiveDate, to: NaiveDate) -> PlannerResult<Self> {
        Self::new(start_of_day(from), end_of_day(to))
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Build a window from command-line style arguments.
    ///
    /// - `from`: YYYY-MM-DD (start of day) or YYYY-MM-DDTHH:MM[:SS]; defaults to the start of `today`
    /// - `to`: YYYY-MM-DD (end of day) or a datetime; defaults to the end of the
    ///   `span_days`-th day counted from `from`
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        span_days: i64,
    ) -> PlannerResult<Self> {
        let start = match from {
            Some(s) => parse_bound(s, start_of_day)?,
            None => start_of_day(today),
        };

        let end = match to {
            Some(s) => parse_bound(s, end_of_day)?,
            None => {
                let last_day = Duration::try_days(span_days.max(1) - 1)
                    .and_then(|span| start.date().checked_add_signed(span))
                    .ok_or_else(|| {
                        PlannerError::InvalidWindow(format!("span of {} days is too long", span_days))
                    })?;
                end_of_day(last_day)
            }
        };

        Self::new(start, end)
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of `date`, shared by windows and all-day events.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    )
}

/// Parse a datetime, or a bare date resolved with `on_date`.
pub fn parse_bound(s: &str, on_date: fn(NaiveDate) -> NaiveDateTime) -> PlannerResult<NaiveDateTime> {
    let s = s.trim();

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(on_date)
        .map_err(|_| {
            PlannerError::InvalidWindow(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
                s
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let result = Window::new(end_of_day(date(2024, 1, 2)), start_of_day(date(2024, 1, 1)));
        assert!(matches!(result, Err(PlannerError::InvalidWindow(_))));
    }

    #[test]
    fn contains_is_inclusive() {
        let window = Window::days(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert!(window.contains(start_of_day(date(2024, 1, 1))));
        assert!(window.contains(end_of_day(date(2024, 1, 1))));
        assert!(!window.contains(start_of_day(date(2024, 1, 2))));
    }

    #[test]
    fn from_args_defaults_to_span_from_today() {
        let window = Window::from_args(None, None, date(2024, 3, 10), 7).unwrap();
        assert_eq!(window.start, start_of_day(date(2024, 3, 10)));
        assert_eq!(window.end, end_of_day(date(2024, 3, 16)));
    }

    #[test]
    fn from_args_span_follows_explicit_from() {
        let window = Window::from_args(Some("2024-02-27"), None, date(2030, 1, 1), 3).unwrap();
        assert_eq!(window.start, start_of_day(date(2024, 2, 27)));
        assert_eq!(window.end, end_of_day(date(2024, 2, 29)));
    }

    #[test]
    fn from_args_accepts_times() {
        let window =
            Window::from_args(Some("2024-01-05T08:30"), Some("2024-01-05 17:00"), date(2024, 1, 1), 7)
                .unwrap();
        assert_eq!(window.start, date(2024, 1, 5).and_hms_opt(8, 30, 0).unwrap());
        assert_eq!(window.end, date(2024, 1, 5).and_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn from_args_rejects_garbage() {
        assert!(Window::from_args(Some("next week"), None, date(2024, 1, 1), 7).is_err());
        assert!(Window::from_args(Some("2024-01-10"), Some("2024-01-01"), date(2024, 1, 1), 7).is_err());
    }
}
