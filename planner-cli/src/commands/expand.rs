use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use planner_core::{EventDefinition, Occurrence, Window, expand_all, sort_chronologically};

use crate::render::{Render, format_date_label, pluralize};

pub fn run(
    events: &[EventDefinition],
    window: Window,
    sorted: bool,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let mut occurrences = expand_all(events, &window);

    if sorted {
        sort_chronologically(&mut occurrences);
    }

    if json {
        let output =
            serde_json::to_string_pretty(&occurrences).context("Failed to serialize occurrences")?;
        println!("{}", output);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for line in render_grouped(&occurrences, today) {
        println!("{}", line);
    }

    println!();
    println!(
        "{}",
        format!(
            "{} {} from {} {}",
            occurrences.len(),
            pluralize("occurrence", occurrences.len()),
            events.len(),
            pluralize("event", events.len())
        )
        .dimmed()
    );

    Ok(())
}

/// Group consecutive occurrences under a heading per day.
///
/// Without sorting, a day can appear more than once: each event's run gets
/// its own headings.
fn render_grouped(occurrences: &[Occurrence], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for occurrence in occurrences {
        let date = occurrence.start.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(date, today).bold().to_string());
            current_date = Some(date);
        }

        lines.push(occurrence.render());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use planner_core::RecurrencePattern;

    #[test]
    fn groups_by_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let mut event = EventDefinition::new("daily", "Daily", start, start + Duration::hours(1));
        event.is_recurring = true;
        event.recurring_pattern = RecurrencePattern::Daily;

        let window = Window::days(start.date(), start.date() + Duration::days(1)).unwrap();
        let occurrences = expand_all(&[event], &window);
        let lines = render_grouped(&occurrences, start.date());

        // heading, occurrence, blank, heading, occurrence
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Today"));
        assert!(lines[1].contains("Daily"));
        assert!(lines[2].is_empty());
        assert!(lines[3].contains("Tomorrow"));
    }
}
