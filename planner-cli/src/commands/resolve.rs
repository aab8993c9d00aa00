use anyhow::Result;
use planner_core::{EventDefinition, OccurrenceException, resolve_id};

use crate::render::Render;

/// Show the stored event behind an occurrence id.
pub fn run(events: &[EventDefinition], id: &str) -> Result<()> {
    let (event, ordinal) = lookup(events, id)?;

    println!("{}", event.render());

    if let Some(ordinal) = ordinal {
        println!("{}", describe_occurrence(event, ordinal));
    }

    Ok(())
}

fn lookup<'a>(events: &'a [EventDefinition], id: &str) -> Result<(&'a EventDefinition, Option<u32>)> {
    let Some(found) = resolve_id(id, events) else {
        anyhow::bail!(
            "'{}' does not match any stored event. It may have been deleted since it was displayed.",
            id
        );
    };
    Ok(found)
}

fn describe_occurrence(event: &EventDefinition, ordinal: u32) -> String {
    match event.exceptions.get(&ordinal) {
        Some(OccurrenceException::Cancelled) => format!("  occurrence #{} (cancelled)", ordinal),
        Some(OccurrenceException::Modified(_)) => format!("  occurrence #{} (edited)", ordinal),
        None => format!("  occurrence #{}", ordinal),
    }
}
