//! Terminal rendering for planner types.
//!
//! Extension traits that add colored output to planner-core types using owo_colors.

use chrono::{NaiveDate, NaiveDateTime};
use owo_colors::OwoColorize;
use planner_core::{Cadence, EventDefinition, Occurrence, RecurrenceUnit};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let time = if self.all_day {
            format!("{:>7}", "all-day")
        } else {
            format!("{:>7}", self.start.format("%H:%M"))
        };

        let mut line = format!("  {} {}", time, self.title);

        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {}", location).dimmed().to_string());
        }
        if self.modified {
            line.push_str(&" (edited)".yellow().to_string());
        }

        let id = match self.id.ordinal() {
            Some(ordinal) => format!("{} #{}", self.id.original_id(), ordinal),
            None => self.id.to_string(),
        };
        format!("{} {}", line, format!("[{}]", id).dimmed())
    }
}

impl Render for EventDefinition {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", self.title.bold(), format!("[{}]", self.id).dimmed()),
            format!("  {} → {}", format_instant(self.start), format_instant(self.end)),
            format!("  {}", describe_rule(self)),
        ];

        if let Some(location) = &self.location {
            lines.push(format!("  @ {}", location));
        }
        if !self.exceptions.is_empty() {
            lines.push(format!(
                "  {} {}",
                self.exceptions.len(),
                pluralize("exception", self.exceptions.len())
            ));
        }

        lines.join("\n")
    }
}

/// Human-readable summary of an event's recurrence rule.
pub fn describe_rule(event: &EventDefinition) -> String {
    let rule = event.rule();

    let cadence = match rule.cadence() {
        Ok(cadence) => cadence,
        Err(err) => return format!("{} {}", "invalid rule:".red(), err),
    };

    let repeat = match cadence {
        Cadence::Once => return "does not repeat".to_string(),
        Cadence::Step { interval: 1, unit } => format!("every {}", unit_name(unit, 1)),
        Cadence::Step { interval, unit } => format!("every {} {}", interval, unit_name(unit, interval)),
        Cadence::Weekdays { interval_weeks, days } => {
            const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
            let names: Vec<_> = days.indices().map(|i| NAMES[usize::from(i)]).collect();
            if interval_weeks == 1 {
                format!("weekly on {}", names.join(", "))
            } else {
                format!("every {} weeks on {}", interval_weeks, names.join(", "))
            }
        }
    };

    match rule.end_condition() {
        Ok(end) => {
            let mut parts = vec![repeat];
            if let Some(date) = end.end_date {
                parts.push(format!("until {}", format_date(date)));
            }
            parts.push(format!("at most {} times", end.max_occurrences));
            parts.join(", ")
        }
        Err(err) => format!("{} {}", "invalid rule:".red(), err),
    }
}

fn unit_name(unit: RecurrenceUnit, count: u32) -> &'static str {
    let (one, many) = match unit {
        RecurrenceUnit::Days => ("day", "days"),
        RecurrenceUnit::Weeks => ("week", "weeks"),
        RecurrenceUnit::Months => ("month", "months"),
        RecurrenceUnit::Years => ("year", "years"),
    };
    if count == 1 { one } else { many }
}

/// Day heading for grouped output (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => format_date(date),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %-d %Y").to_string()
}

fn format_instant(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
