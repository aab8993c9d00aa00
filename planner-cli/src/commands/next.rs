use anyhow::Result;
use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use planner_core::{EventDefinition, Occurrence, next_occurrence, resolve_id};

use crate::render::Render;

/// Print the first occurrence of an event after `after`.
///
/// `id` may be an event id or any instance id of it.
pub fn run(events: &[EventDefinition], id: &str, after: NaiveDateTime) -> Result<()> {
    let (event, next) = find_next(events, id, after)?;

    match next {
        Some(occurrence) => {
            println!("{}", occurrence.start.format("%a %b %-d %Y").bold());
            println!("{}", occurrence.render());
        }
        None => println!(
            "{}",
            format!("'{}' has no occurrences after {}", event.title, after.format("%Y-%m-%d %H:%M"))
                .dimmed()
        ),
    }

    Ok(())
}

fn find_next<'a>(
    events: &'a [EventDefinition],
    id: &str,
    after: NaiveDateTime,
) -> Result<(&'a EventDefinition, Option<Occurrence>)> {
    let Some((event, _)) = resolve_id(id, events) else {
        anyhow::bail!("No event matches '{}'", id);
    };
    Ok((event, next_occurrence(event, after)))
}
